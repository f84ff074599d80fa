//! The seam to the external ATL validator.
//!
//! The annotator never parses ATL itself. It hands the raw document text to a [`Validator`]
//! and displays whatever errors come back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;
use std::process::ExitStatus;

/// A validation request: the raw document text and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest<'a> {
    /// Full document text.
    pub raw: &'a str,
    /// Document path, used by the validator for relative includes and messages.
    pub file: &'a Path,
    /// Whether the validator should also load the referenced RAML specification.
    pub load_raml: bool,
}

/// Source location of a validation error, as character offsets into the request text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    /// Start offset (inclusive).
    pub start_position: usize,
    /// End offset (exclusive).
    pub end_position: usize,
}

/// One error reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description.
    pub message: String,
    /// Where the error is, when the validator knows.
    #[serde(default)]
    pub node: Option<SourceNode>,
}

impl ValidationError {
    /// An error anchored at `start..end`.
    pub fn at(start: usize, end: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node: Some(SourceNode {
                start_position: start,
                end_position: end,
            }),
        }
    }

    /// An error without a source location.
    pub fn unlocated(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node: None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Failure of the validator itself (as opposed to errors it reports about the document).
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// The validator program could not be started.
    #[error("failed to start validator `{program}`: {source}")]
    Spawn {
        /// Program that was started.
        program: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Talking to the validator failed.
    #[error("validator I/O error: {0}")]
    Io(#[from] io::Error),
    /// The validator exited unsuccessfully.
    #[error("validator exited with {status}: {stderr}")]
    Exited {
        /// Exit status.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// The validator's report could not be decoded (or the request encoded).
    #[error("invalid validator report: {0}")]
    Json(#[from] serde_json::Error),
    /// Any other validator failure.
    #[error("{0}")]
    Failed(String),
}

/// Something that validates ATL documents.
///
/// Validation is synchronous; the call blocks the event thread until it returns.
pub trait Validator {
    /// Validate `request`, returning the reported errors in validator order.
    fn validate(&self, request: &ValidationRequest<'_>)
    -> Result<Vec<ValidationError>, ValidatorError>;
}

impl<F> Validator for F
where
    F: Fn(&ValidationRequest<'_>) -> Result<Vec<ValidationError>, ValidatorError>,
{
    fn validate(
        &self,
        request: &ValidationRequest<'_>,
    ) -> Result<Vec<ValidationError>, ValidatorError> {
        self(request)
    }
}
