#![warn(missing_docs)]
//! `atl-annotator` - highlights ATL validation errors in the active editor.
//!
//! Documents of the configured language (YAML by default) that start with the `#%ATL 1.0`
//! header are handed to an external [`Validator`]. Located errors become underlined
//! decorations with the error text as hover message, and a status bar indicator reading
//! "Run tests" is shown while such a document is active.
//!
//! ```text
//! window event ──► EventBridge ──► Annotator::refresh ──► translate ──► Validator
//!                                        │
//!                                        └──► set_decorations / indicator show|hide
//! ```
//!
//! # Example
//!
//! ```rust
//! use atl_annotator::{AnnotatorConfig, AtlExtension, ValidationError, ValidationRequest, ValidatorError};
//! use atl_host::{TextDocument, Window};
//!
//! fn validate(_: &ValidationRequest<'_>) -> Result<Vec<ValidationError>, ValidatorError> {
//!     Ok(vec![ValidationError::at(11, 14, "bad key")])
//! }
//!
//! let mut window = Window::new();
//! let extension = AtlExtension::activate(&mut window, AnnotatorConfig::default(), Box::new(validate));
//!
//! let id = window.open_text_editor(TextDocument::new("suite.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));
//! let editor = window.text_editor(id).unwrap();
//! let decorations = editor.decorations(extension.annotator().decoration_type().id());
//! assert_eq!(decorations.len(), 1);
//! assert_eq!(decorations[0].hover_message.as_deref(), Some("bad key"));
//! assert_eq!(extension.annotator().indicator_text(), "Run tests");
//! ```

pub mod annotator;
pub mod bridge;
pub mod command_validator;
pub mod config;
pub mod extension;
pub mod translate;
pub mod validator;

pub use annotator::{Annotator, RefreshOutcome, error_decoration_options};
pub use bridge::EventBridge;
pub use command_validator::{CommandValidator, decode_report};
pub use config::{
    ATL_HEADER, AnnotatorConfig, ConfigError, DEFAULT_INDICATOR_TEXT, DEFAULT_LANGUAGE_ID,
    IndicatorAlignment, OffsetEncoding, ValidatorCommandConfig,
};
pub use extension::{AtlExtension, validator_from_config};
pub use translate::{error_range, translate, validate_document};
pub use validator::{SourceNode, ValidationError, ValidationRequest, Validator, ValidatorError};
