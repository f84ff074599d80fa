//! Annotator configuration.
//!
//! Defaults reproduce the stock behaviour (YAML documents, `#%ATL 1.0` header, "Run tests"
//! label). A JSON settings file can override any field, and a few environment variables
//! override the file:
//!
//! - `ATL_VALIDATOR_CMD`: validator program (enables the [`CommandValidator`](crate::CommandValidator))
//! - `ATL_VALIDATOR_ARGS`: whitespace-separated arguments for that program
//! - `ATL_LANGUAGE_ID`: language id of documents to validate
//! - `ATL_OFFSET_ENCODING`: `char` or `utf16`, the unit of validator offsets

use atl_host::StatusBarAlignment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Header every ATL document starts with.
pub const ATL_HEADER: &str = "#%ATL 1.0";

/// Language id of documents the annotator looks at.
pub const DEFAULT_LANGUAGE_ID: &str = "yaml";

/// Indicator label while an ATL document is active.
pub const DEFAULT_INDICATOR_TEXT: &str = "Run tests";

/// Indicator placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorAlignment {
    /// Left side of the status bar.
    #[default]
    Left,
    /// Right side of the status bar.
    Right,
}

impl From<IndicatorAlignment> for StatusBarAlignment {
    fn from(value: IndicatorAlignment) -> Self {
        match value {
            IndicatorAlignment::Left => StatusBarAlignment::Left,
            IndicatorAlignment::Right => StatusBarAlignment::Right,
        }
    }
}

/// Unit of the offsets a validator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetEncoding {
    /// Unicode scalar values (Rust `char`s).
    #[default]
    Char,
    /// UTF-16 code units, as produced by JavaScript validators.
    Utf16,
}

/// External validator program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorCommandConfig {
    /// Program to run.
    pub program: String,
    /// Arguments passed before the request is written to stdin.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Annotator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotatorConfig {
    /// Only documents with this language id are validated.
    pub language_id: String,
    /// Documents must start with this header to be validated.
    pub header: String,
    /// Indicator label shown while a validated document is active.
    pub indicator_text: String,
    /// Passed through to the validator; the annotator never asks it to load RAML.
    pub load_raml: bool,
    /// Indicator placement.
    pub indicator_alignment: IndicatorAlignment,
    /// Indicator priority within its side of the status bar.
    pub indicator_priority: i32,
    /// External validator program, if one is configured.
    pub validator: Option<ValidatorCommandConfig>,
    /// Unit of the offsets in validator reports.
    pub offset_encoding: OffsetEncoding,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            language_id: DEFAULT_LANGUAGE_ID.to_string(),
            header: ATL_HEADER.to_string(),
            indicator_text: DEFAULT_INDICATOR_TEXT.to_string(),
            load_raml: false,
            indicator_alignment: IndicatorAlignment::Left,
            indicator_priority: 0,
            validator: None,
            offset_encoding: OffsetEncoding::Char,
        }
    }
}

/// Errors loading a settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Settings file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid settings JSON.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl AnnotatorConfig {
    /// Parse settings from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `ATL_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(language_id) = non_empty("ATL_LANGUAGE_ID") {
            self.language_id = language_id.trim().to_string();
        }

        match non_empty("ATL_OFFSET_ENCODING").as_deref().map(str::trim) {
            Some("char") => self.offset_encoding = OffsetEncoding::Char,
            Some("utf16" | "utf-16") => self.offset_encoding = OffsetEncoding::Utf16,
            Some(other) => tracing::warn!(value = other, "ignoring unknown ATL_OFFSET_ENCODING"),
            None => {}
        }

        if let Some(program) = non_empty("ATL_VALIDATOR_CMD") {
            let args = non_empty("ATL_VALIDATOR_ARGS")
                .map(|args| args.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            self.validator = Some(ValidatorCommandConfig {
                program: program.trim().to_string(),
                args,
            });
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AnnotatorConfig::default();
        assert_eq!(config.language_id, "yaml");
        assert_eq!(config.header, "#%ATL 1.0");
        assert_eq!(config.indicator_text, "Run tests");
        assert!(!config.load_raml);
        assert_eq!(config.validator, None);
        assert_eq!(config.offset_encoding, OffsetEncoding::Char);
    }

    #[test]
    fn test_offset_encoding_from_json() {
        let config = AnnotatorConfig::from_json_str(r#"{ "offsetEncoding": "utf16" }"#).unwrap();
        assert_eq!(config.offset_encoding, OffsetEncoding::Utf16);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnnotatorConfig::from_json_str(
            r#"{ "indicatorText": "ATL", "validator": { "program": "atl-check" } }"#,
        )
        .unwrap();

        assert_eq!(
            config,
            AnnotatorConfig {
                indicator_text: "ATL".to_string(),
                validator: Some(ValidatorCommandConfig {
                    program: "atl-check".to_string(),
                    args: Vec::new(),
                }),
                ..AnnotatorConfig::default()
            }
        );
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(AnnotatorConfig::from_json_str(r#"{ "loadRaml": "yes" }"#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ATL_VALIDATOR_CMD", "node"),
            ("ATL_VALIDATOR_ARGS", "validate.js  --json"),
            ("ATL_LANGUAGE_ID", " "),
            ("ATL_OFFSET_ENCODING", "utf-16"),
        ]
        .into_iter()
        .collect();

        let config = AnnotatorConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.language_id, "yaml");
        assert_eq!(config.offset_encoding, OffsetEncoding::Utf16);
        assert_eq!(
            config.validator,
            Some(ValidatorCommandConfig {
                program: "node".to_string(),
                args: vec!["validate.js".to_string(), "--json".to_string()],
            })
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnnotatorConfig::load(Path::new("/nonexistent/atl-annotator.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
