//! Turning validator output into editor decorations.

use crate::config::{AnnotatorConfig, OffsetEncoding};
use crate::validator::{ValidationError, ValidationRequest, Validator, ValidatorError};
use atl_host::{DecorationOptions, Range, TextDocument};

/// Validate `document` and convert the reported errors into decorations.
///
/// Returns `Ok(None)` when the document does not start with the configured header (nothing to
/// validate). Otherwise returns one decoration per located error, in validator order; errors
/// without a source location are not shown. `Ok(Some(vec![]))` means the document is valid.
pub fn translate(
    document: &TextDocument,
    validator: &dyn Validator,
    config: &AnnotatorConfig,
) -> Result<Option<Vec<DecorationOptions>>, ValidatorError> {
    let Some(errors) = validate_document(document, validator, config)? else {
        return Ok(None);
    };

    let decorations: Vec<DecorationOptions> = errors
        .iter()
        .filter_map(|error| {
            let range = error_range(document, error, config.offset_encoding)?;
            Some(DecorationOptions::with_hover(range, error.to_string()))
        })
        .collect();

    let unlocated = errors.len() - decorations.len();
    if unlocated > 0 {
        tracing::debug!(
            file = %document.file_name().display(),
            unlocated,
            "dropping validation errors without a source location"
        );
    }

    Ok(Some(decorations))
}

/// Run `validator` on `document` if it starts with the configured header.
///
/// Returns the raw report, located or not, in validator order.
pub fn validate_document(
    document: &TextDocument,
    validator: &dyn Validator,
    config: &AnnotatorConfig,
) -> Result<Option<Vec<ValidationError>>, ValidatorError> {
    if !document.starts_with(&config.header) {
        return Ok(None);
    }

    let raw = document.get_text();
    let request = ValidationRequest {
        raw: &raw,
        file: document.file_name(),
        load_raml: config.load_raml,
    };
    validator.validate(&request).map(Some)
}

/// The document range an error points at, or `None` when it has no source location.
pub fn error_range(
    document: &TextDocument,
    error: &ValidationError,
    encoding: OffsetEncoding,
) -> Option<Range> {
    let node = error.node?;
    let position_at = |offset| match encoding {
        OffsetEncoding::Char => document.position_at(offset),
        OffsetEncoding::Utf16 => document.position_at_utf16(offset),
    };
    Some(Range::new(
        position_at(node.start_position),
        position_at(node.end_position),
    ))
}
