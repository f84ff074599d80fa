//! The annotator: decides whether the active document is validated and reflects the result
//! as decorations plus a status bar indicator.

use crate::config::AnnotatorConfig;
use crate::translate::{translate, validate_document};
use crate::validator::{ValidationError, Validator, ValidatorError};
use atl_host::{
    DecorationOptions, DecorationRenderOptions, Disposable, OverviewRulerLane, StatusBarItem,
    TextDecorationLine, TextDocument, TextEditor, TextEditorDecorationType,
    ThemableDecorationRenderOptions, Window,
};
use std::cell::RefCell;

/// Render options for validation errors: red underline plus a red marker in the right lane of
/// the overview ruler.
pub fn error_decoration_options() -> DecorationRenderOptions {
    let themed = ThemableDecorationRenderOptions {
        text_decoration: Some(TextDecorationLine::Underline),
        color: Some("red".to_string()),
    };

    DecorationRenderOptions {
        text_decoration: Some(TextDecorationLine::Underline),
        overview_ruler_color: Some("red".to_string()),
        overview_ruler_lane: Some(OverviewRulerLane::Right),
        light: Some(themed.clone()),
        dark: Some(themed),
    }
}

/// Which branch a [`Annotator::refresh`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No editor is focused.
    NoEditor,
    /// The focused document is not of the configured language.
    LanguageMismatch,
    /// The document lacks the ATL header; decorations were cleared.
    NotApplicable,
    /// The document was validated and `count` decorations applied.
    Annotated {
        /// Number of decorations applied.
        count: usize,
    },
    /// The validator failed; decorations were cleared.
    ValidatorFailed,
}

/// Validates the active ATL document and shows the result.
pub struct Annotator {
    indicator: RefCell<StatusBarItem>,
    decoration_type: TextEditorDecorationType,
    validator: Box<dyn Validator>,
    config: AnnotatorConfig,
}

impl Annotator {
    /// Create an annotator, registering its decoration type and indicator with `window`.
    pub fn new(window: &mut Window, config: AnnotatorConfig, validator: Box<dyn Validator>) -> Self {
        let decoration_type = window.create_text_editor_decoration_type(error_decoration_options());
        let indicator = window.create_status_bar_item(
            config.indicator_alignment.into(),
            config.indicator_priority,
        );
        Self::from_parts(indicator, decoration_type, validator, config)
    }

    /// Create an annotator from already created host resources.
    pub fn from_parts(
        indicator: StatusBarItem,
        decoration_type: TextEditorDecorationType,
        validator: Box<dyn Validator>,
        config: AnnotatorConfig,
    ) -> Self {
        Self {
            indicator: RefCell::new(indicator),
            decoration_type,
            validator,
            config,
        }
    }

    /// Re-evaluate `editor` (the active editor, if any) and update decorations and indicator.
    ///
    /// Never fails: every failure path ends with the indicator hidden.
    pub fn refresh(&self, editor: Option<&mut TextEditor>) -> RefreshOutcome {
        let Some(editor) = editor else {
            self.indicator.borrow().hide();
            return RefreshOutcome::NoEditor;
        };

        if editor.document().language_id() != self.config.language_id {
            self.indicator.borrow().hide();
            return RefreshOutcome::LanguageMismatch;
        }

        let outcome = match self.translate(editor.document()) {
            Ok(None) => {
                editor.set_decorations(&self.decoration_type, Vec::new());
                self.indicator.borrow().hide();
                RefreshOutcome::NotApplicable
            }
            Ok(Some(decorations)) => {
                let count = decorations.len();
                editor.set_decorations(&self.decoration_type, decorations);
                let indicator = self.indicator.borrow();
                indicator.show();
                indicator.set_text(self.config.indicator_text.as_str());
                RefreshOutcome::Annotated { count }
            }
            Err(err) => {
                tracing::warn!(
                    file = %editor.document().file_name().display(),
                    error = %err,
                    "ATL validation failed"
                );
                editor.set_decorations(&self.decoration_type, Vec::new());
                self.indicator.borrow().hide();
                RefreshOutcome::ValidatorFailed
            }
        };

        tracing::debug!(
            editor = editor.id().get(),
            version = editor.document().version(),
            ?outcome,
            "refreshed ATL annotations"
        );
        outcome
    }

    /// Validate `document` and build its decorations (`None` when it has no ATL header).
    pub fn translate(
        &self,
        document: &TextDocument,
    ) -> Result<Option<Vec<DecorationOptions>>, ValidatorError> {
        translate(document, self.validator.as_ref(), &self.config)
    }

    /// Run the validator on `document` without touching any editor.
    ///
    /// Returns every reported error, including those without a source location, or `None`
    /// when the document has no ATL header.
    pub fn validate(
        &self,
        document: &TextDocument,
    ) -> Result<Option<Vec<ValidationError>>, ValidatorError> {
        validate_document(document, self.validator.as_ref(), &self.config)
    }

    /// The decoration type validation errors are drawn with.
    pub fn decoration_type(&self) -> &TextEditorDecorationType {
        &self.decoration_type
    }

    /// Whether the indicator is currently shown.
    pub fn is_indicator_visible(&self) -> bool {
        self.indicator.borrow().is_visible()
    }

    /// The indicator's current label.
    pub fn indicator_text(&self) -> String {
        self.indicator.borrow().text()
    }

    /// Settings in effect.
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Remove the indicator from the status bar. Idempotent.
    pub fn dispose(&self) {
        self.indicator.borrow_mut().dispose();
    }

    /// Whether [`Annotator::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.indicator.borrow().is_disposed()
    }
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("decoration_type", &self.decoration_type.id())
            .field("indicator", &self.indicator)
            .field("config", &self.config)
            .finish()
    }
}
