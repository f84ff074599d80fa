//! Validator backed by an external program.
//!
//! The program is started once per validation. The request is written to its stdin as JSON
//! and the report is read from its stdout:
//!
//! ```text
//! stdin:  {"raw": "...", "file": "suite.yaml", "loadRaml": false}
//! stdout: [{"message": "...", "node": {"startPosition": 11, "endPosition": 14}}, ...]
//!     or  {"errors": [...]}
//! ```
//!
//! Empty output means "no errors". A non-zero exit status is a validator failure.
//!
//! `startPosition`/`endPosition` are offsets into `raw`, counted in `char`s unless the
//! settings select `offsetEncoding: "utf16"` (UTF-16 code units, as JavaScript validators
//! report them).

use crate::config::ValidatorCommandConfig;
use crate::validator::{ValidationError, ValidationRequest, Validator, ValidatorError};
use serde::Deserialize;
use std::io::{self, Write};
use std::process::{Command as ProcessCommand, Stdio};
use std::thread;

/// Runs an external validator program for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandValidator {
    program: String,
    args: Vec<String>,
}

impl CommandValidator {
    /// Create a validator running `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Create a validator from settings.
    pub fn from_config(config: &ValidatorCommandConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    /// The program this validator runs.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Validator for CommandValidator {
    fn validate(
        &self,
        request: &ValidationRequest<'_>,
    ) -> Result<Vec<ValidationError>, ValidatorError> {
        let payload = serde_json::to_vec(request)?;

        let mut child = ProcessCommand::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ValidatorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("Failed to open validator stdin"))?;

        // The child may fill its stdout pipe before it has read all of stdin.
        let writer = thread::spawn(move || -> io::Result<()> {
            stdin.write_all(&payload)?;
            stdin.flush()
        });

        let output = child.wait_with_output()?;
        let write_result = writer
            .join()
            .map_err(|_| io::Error::other("validator stdin writer panicked"))?;

        if !output.status.success() {
            return Err(ValidatorError::Exited {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A validator may exit without consuming its input; that is fine once it succeeded.
        if let Err(err) = write_result
            && err.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(err.into());
        }

        let report = decode_report(&output.stdout)?;
        tracing::trace!(
            program = %self.program,
            errors = report.len(),
            "validator finished"
        );
        Ok(report)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Report {
    List(Vec<ValidationError>),
    Object { errors: Vec<ValidationError> },
}

/// Decode a validator report (a JSON error list, or an object with an `errors` list).
pub fn decode_report(bytes: &[u8]) -> Result<Vec<ValidationError>, ValidatorError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    match serde_json::from_slice::<Report>(bytes)? {
        Report::List(errors) | Report::Object { errors } => Ok(errors),
    }
}
