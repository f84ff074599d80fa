use atl_annotator::{
    Annotator, AnnotatorConfig, RefreshOutcome, ValidationError, ValidationRequest, Validator,
    ValidatorError,
};
use atl_host::{DecorationOptions, Position, Range, TextDocument, Window};
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Script {
    report: RefCell<Vec<ValidationError>>,
    fail: Cell<bool>,
    calls: Cell<usize>,
}

#[derive(Clone, Default)]
struct ScriptedValidator(Rc<Script>);

impl ScriptedValidator {
    fn reporting(errors: Vec<ValidationError>) -> Self {
        let validator = Self::default();
        *validator.0.report.borrow_mut() = errors;
        validator
    }
}

impl Validator for ScriptedValidator {
    fn validate(
        &self,
        _request: &ValidationRequest<'_>,
    ) -> Result<Vec<ValidationError>, ValidatorError> {
        self.0.calls.set(self.0.calls.get() + 1);
        if self.0.fail.get() {
            return Err(ValidatorError::Failed("validator crashed".to_string()));
        }
        Ok(self.0.report.borrow().clone())
    }
}

fn setup(validator: &ScriptedValidator) -> (Window, Annotator) {
    let mut window = Window::new();
    let annotator = Annotator::new(
        &mut window,
        AnnotatorConfig::default(),
        Box::new(validator.clone()),
    );
    (window, annotator)
}

fn range(l0: usize, c0: usize, l1: usize, c1: usize) -> Range {
    Range::new(Position::new(l0, c0), Position::new(l1, c1))
}

#[test]
fn test_no_editor_hides_indicator() {
    let validator = ScriptedValidator::default();
    let (mut window, annotator) = setup(&validator);

    assert_eq!(
        annotator.refresh(window.active_text_editor_mut()),
        RefreshOutcome::NoEditor
    );
    assert!(!annotator.is_indicator_visible());
    assert!(window.status_bar().visible_items().is_empty());
    assert_eq!(validator.0.calls.get(), 0);
}

#[test]
fn test_other_language_hides_indicator_without_decoration_call() {
    let validator = ScriptedValidator::reporting(vec![ValidationError::at(0, 1, "x")]);
    let (mut window, annotator) = setup(&validator);

    let id = window.open_text_editor(TextDocument::new("notes.md", "markdown", "#%ATL 1.0\n"));
    let outcome = annotator.refresh(window.active_text_editor_mut());

    assert_eq!(outcome, RefreshOutcome::LanguageMismatch);
    assert!(!annotator.is_indicator_visible());
    assert_eq!(window.text_editor(id).unwrap().decoration_calls(), 0);
    assert_eq!(validator.0.calls.get(), 0);
}

#[test]
fn test_missing_header_clears_and_hides() {
    let validator = ScriptedValidator::default();
    let (mut window, annotator) = setup(&validator);
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "plain text"));

    // Pretend an earlier refresh left something behind.
    window.text_editor_mut(id).unwrap().set_decorations(
        annotator.decoration_type(),
        vec![DecorationOptions::with_hover(range(0, 0, 0, 5), "stale")],
    );

    let outcome = annotator.refresh(window.active_text_editor_mut());

    assert_eq!(outcome, RefreshOutcome::NotApplicable);
    let editor = window.text_editor(id).unwrap();
    assert!(editor.decorations(annotator.decoration_type().id()).is_empty());
    assert_eq!(editor.decoration_calls(), 2);
    assert!(!annotator.is_indicator_visible());
    assert_eq!(validator.0.calls.get(), 0);
}

#[test]
fn test_valid_document_shows_indicator_with_empty_decorations() {
    let validator = ScriptedValidator::default();
    let (mut window, annotator) = setup(&validator);
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\ntests: {}"));

    let outcome = annotator.refresh(window.active_text_editor_mut());

    assert_eq!(outcome, RefreshOutcome::Annotated { count: 0 });
    let editor = window.text_editor(id).unwrap();
    assert_eq!(editor.decoration_calls(), 1);
    assert!(editor.decorations(annotator.decoration_type().id()).is_empty());
    assert!(annotator.is_indicator_visible());
    assert_eq!(annotator.indicator_text(), "Run tests");

    let visible = window.status_bar().visible_items();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].text, "Run tests");
}

#[test]
fn test_bad_key_scenario() {
    let validator = ScriptedValidator::reporting(vec![ValidationError::at(11, 14, "bad key")]);
    let (mut window, annotator) = setup(&validator);
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));

    let outcome = annotator.refresh(window.active_text_editor_mut());

    assert_eq!(outcome, RefreshOutcome::Annotated { count: 1 });
    assert_eq!(
        window
            .text_editor(id)
            .unwrap()
            .decorations(annotator.decoration_type().id()),
        &[DecorationOptions::with_hover(range(1, 1, 1, 4), "bad key")]
    );
    assert!(annotator.is_indicator_visible());
    assert_eq!(annotator.indicator_text(), "Run tests");
}

#[test]
fn test_unlocated_errors_are_not_applied() {
    let validator = ScriptedValidator::reporting(vec![
        ValidationError::unlocated("missing tests"),
        ValidationError::at(10, 13, "first"),
        ValidationError::unlocated("another"),
        ValidationError::at(15, 18, "second"),
    ]);
    let (mut window, annotator) = setup(&validator);
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));

    let outcome = annotator.refresh(window.active_text_editor_mut());
    assert_eq!(outcome, RefreshOutcome::Annotated { count: 2 });

    let hovers: Vec<Option<String>> = window
        .text_editor(id)
        .unwrap()
        .decorations(annotator.decoration_type().id())
        .iter()
        .map(|d| d.hover_message.clone())
        .collect();
    assert_eq!(
        hovers,
        vec![Some("first".to_string()), Some("second".to_string())]
    );
}

#[test]
fn test_refresh_is_idempotent() {
    let validator = ScriptedValidator::reporting(vec![
        ValidationError::at(15, 18, "b"),
        ValidationError::at(10, 13, "a"),
    ]);
    let (mut window, annotator) = setup(&validator);
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));

    annotator.refresh(window.active_text_editor_mut());
    let first = window
        .text_editor(id)
        .unwrap()
        .decorations(annotator.decoration_type().id())
        .to_vec();
    let first_status = window.status_bar().visible_items();

    annotator.refresh(window.active_text_editor_mut());
    let second = window
        .text_editor(id)
        .unwrap()
        .decorations(annotator.decoration_type().id())
        .to_vec();

    assert_eq!(first, second);
    assert_eq!(first_status, window.status_bar().visible_items());
    // Order follows the validator, not the document.
    assert_eq!(first[0].hover_message.as_deref(), Some("b"));
}

#[test]
fn test_refresh_replaces_previous_decorations() {
    let validator = ScriptedValidator::reporting(vec![
        ValidationError::at(10, 13, "a"),
        ValidationError::at(15, 18, "b"),
    ]);
    let (mut window, annotator) = setup(&validator);
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));
    annotator.refresh(window.active_text_editor_mut());

    *validator.0.report.borrow_mut() = vec![ValidationError::at(10, 13, "only")];
    annotator.refresh(window.active_text_editor_mut());

    assert_eq!(
        window
            .text_editor(id)
            .unwrap()
            .decorations(annotator.decoration_type().id()),
        &[DecorationOptions::with_hover(range(1, 0, 1, 3), "only")]
    );
}

#[test]
fn test_validator_failure_clears_and_hides() {
    let validator = ScriptedValidator::reporting(vec![ValidationError::at(10, 13, "a")]);
    let (mut window, annotator) = setup(&validator);
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));
    annotator.refresh(window.active_text_editor_mut());
    assert!(annotator.is_indicator_visible());

    validator.0.fail.set(true);
    let outcome = annotator.refresh(window.active_text_editor_mut());

    assert_eq!(outcome, RefreshOutcome::ValidatorFailed);
    assert!(!annotator.is_indicator_visible());
    assert_eq!(
        window
            .text_editor(id)
            .unwrap()
            .decoration_count(),
        0
    );
}

#[test]
fn test_custom_language_and_label() {
    let validator = ScriptedValidator::default();
    let mut window = Window::new();
    let config = AnnotatorConfig {
        language_id: "atl".to_string(),
        indicator_text: "ATL".to_string(),
        ..AnnotatorConfig::default()
    };
    let annotator = Annotator::new(&mut window, config, Box::new(validator.clone()));

    window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\n"));
    assert_eq!(
        annotator.refresh(window.active_text_editor_mut()),
        RefreshOutcome::LanguageMismatch
    );

    window.open_text_editor(TextDocument::new("a.atl", "atl", "#%ATL 1.0\n"));
    assert_eq!(
        annotator.refresh(window.active_text_editor_mut()),
        RefreshOutcome::Annotated { count: 0 }
    );
    assert_eq!(annotator.indicator_text(), "ATL");
}
