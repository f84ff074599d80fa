//! Extension lifecycle: activation and teardown.

use crate::annotator::Annotator;
use crate::bridge::EventBridge;
use crate::command_validator::CommandValidator;
use crate::config::AnnotatorConfig;
use crate::validator::{ValidationError, ValidationRequest, Validator, ValidatorError};
use atl_host::{Disposable, Window};
use std::rc::Rc;

/// The activated ATL annotator extension.
///
/// Owns the annotator and its event bridge. Deactivating (or dropping) releases the event
/// subscriptions first and then removes the indicator.
pub struct AtlExtension {
    bridge: EventBridge,
    annotator: Rc<Annotator>,
}

impl AtlExtension {
    /// Activate against `window`: register the decoration type and indicator, refresh once and
    /// start listening for editor changes.
    pub fn activate(
        window: &mut Window,
        config: AnnotatorConfig,
        validator: Box<dyn Validator>,
    ) -> Self {
        tracing::info!(
            language_id = %config.language_id,
            header = %config.header,
            "ATL annotator is now active"
        );

        let annotator = Rc::new(Annotator::new(window, config, validator));
        let bridge = EventBridge::new(window, Rc::clone(&annotator));
        Self { bridge, annotator }
    }

    /// Activate with the validator named in `config`.
    ///
    /// Without a configured validator program every ATL document fails validation, which
    /// keeps decorations cleared and the indicator hidden.
    pub fn activate_with_config(window: &mut Window, config: AnnotatorConfig) -> Self {
        let validator = validator_from_config(&config);
        Self::activate(window, config, validator)
    }

    /// The annotator.
    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Tear the extension down.
    pub fn deactivate(mut self) {
        self.dispose();
    }
}

/// Build the validator described by `config`.
pub fn validator_from_config(config: &AnnotatorConfig) -> Box<dyn Validator> {
    match &config.validator {
        Some(command) => Box::new(CommandValidator::from_config(command)),
        None => Box::new(Unconfigured),
    }
}

struct Unconfigured;

impl Validator for Unconfigured {
    fn validate(
        &self,
        _request: &ValidationRequest<'_>,
    ) -> Result<Vec<ValidationError>, ValidatorError> {
        Err(ValidatorError::Failed(
            "no ATL validator configured (set ATL_VALIDATOR_CMD)".to_string(),
        ))
    }
}

impl Disposable for AtlExtension {
    fn dispose(&mut self) {
        if self.bridge.is_disposed() && self.annotator.is_disposed() {
            return;
        }
        self.bridge.dispose();
        self.annotator.dispose();
        tracing::info!("ATL annotator deactivated");
    }

    fn is_disposed(&self) -> bool {
        self.bridge.is_disposed() && self.annotator.is_disposed()
    }
}

impl Drop for AtlExtension {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for AtlExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlExtension")
            .field("bridge", &self.bridge)
            .field("annotator", &self.annotator)
            .finish()
    }
}
