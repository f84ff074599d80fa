use atl_annotator::{
    Annotator, AnnotatorConfig, AtlExtension, EventBridge, ValidationError, ValidationRequest,
    ValidatorError,
};
use atl_host::{Disposable, Position, Selection, TextDocument, Window};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

fn counting_validator(
    calls: Rc<Cell<usize>>,
) -> impl Fn(&ValidationRequest<'_>) -> Result<Vec<ValidationError>, ValidatorError> {
    move |request: &ValidationRequest<'_>| {
        calls.set(calls.get() + 1);
        // Flag every "foo" so edits show up in the decorations.
        Ok(request
            .raw
            .match_indices("foo")
            .map(|(start, _)| ValidationError::at(start, start + 3, "bad key"))
            .collect())
    }
}

fn activate(window: &mut Window, calls: &Rc<Cell<usize>>) -> AtlExtension {
    AtlExtension::activate(
        window,
        AnnotatorConfig::default(),
        Box::new(counting_validator(Rc::clone(calls))),
    )
}

#[test]
fn test_activation_refreshes_the_active_editor() {
    let mut window = Window::new();
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));
    let calls = Rc::new(Cell::new(0));

    let extension = activate(&mut window, &calls);

    assert_eq!(calls.get(), 1);
    assert!(extension.annotator().is_indicator_visible());
    let type_id = extension.annotator().decoration_type().id();
    assert_eq!(window.text_editor(id).unwrap().decorations(type_id).len(), 1);
}

#[test]
fn test_activation_without_editor_hides_indicator() {
    let mut window = Window::new();
    let calls = Rc::new(Cell::new(0));

    let extension = activate(&mut window, &calls);

    assert_eq!(calls.get(), 0);
    assert!(!extension.annotator().is_indicator_visible());
    assert_eq!(window.status_bar().len(), 1);
    assert!(window.status_bar().visible_items().is_empty());
}

#[test]
fn test_selection_change_picks_up_edits() {
    let mut window = Window::new();
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nbar: 1"));
    let calls = Rc::new(Cell::new(0));
    let extension = activate(&mut window, &calls);
    let type_id = extension.annotator().decoration_type().id();
    assert!(window.text_editor(id).unwrap().decorations(type_id).is_empty());

    window
        .text_editor_mut(id)
        .unwrap()
        .document_mut()
        .set_text("#%ATL 1.0\nfoo: 1\nfoo: 2");
    window
        .set_selection(id, Selection::caret(Position::new(2, 0)))
        .unwrap();

    assert_eq!(calls.get(), 2);
    let hover_lines: Vec<usize> = window
        .text_editor(id)
        .unwrap()
        .decorations(type_id)
        .iter()
        .map(|d| d.range.start.line)
        .collect();
    assert_eq!(hover_lines, vec![1, 2]);
}

#[test]
fn test_switching_to_other_language_hides_indicator() {
    let mut window = Window::new();
    let atl = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));
    let calls = Rc::new(Cell::new(0));
    let extension = activate(&mut window, &calls);
    assert!(extension.annotator().is_indicator_visible());

    let notes = window.open_text_editor(TextDocument::new("notes.md", "markdown", "# notes"));
    assert!(!extension.annotator().is_indicator_visible());
    assert_eq!(window.text_editor(notes).unwrap().decoration_calls(), 0);

    // Decorations on the now hidden editor are left alone.
    let type_id = extension.annotator().decoration_type().id();
    assert_eq!(window.text_editor(atl).unwrap().decorations(type_id).len(), 1);

    window.set_active_text_editor(Some(atl)).unwrap();
    assert!(extension.annotator().is_indicator_visible());
}

#[test]
fn test_closing_last_editor_hides_indicator() {
    let mut window = Window::new();
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\n"));
    let calls = Rc::new(Cell::new(0));
    let extension = activate(&mut window, &calls);
    assert!(extension.annotator().is_indicator_visible());

    window.close_text_editor(id).unwrap();

    assert!(!extension.annotator().is_indicator_visible());
    assert!(window.status_bar().visible_items().is_empty());
}

#[test]
fn test_deactivate_removes_listeners_and_indicator() {
    let mut window = Window::new();
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));
    let calls = Rc::new(Cell::new(0));
    let extension = activate(&mut window, &calls);
    assert_eq!(window.listener_count(), 2);
    assert_eq!(window.status_bar().len(), 1);

    extension.deactivate();

    assert_eq!(window.listener_count(), 0);
    assert!(window.status_bar().is_empty());

    window
        .set_selection(id, Selection::caret(Position::new(1, 2)))
        .unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_dispose_is_idempotent() {
    let mut window = Window::new();
    let calls = Rc::new(Cell::new(0));
    let mut extension = activate(&mut window, &calls);

    extension.dispose();
    extension.dispose();

    assert!(extension.is_disposed());
    assert_eq!(window.listener_count(), 0);
    assert!(window.status_bar().is_empty());
}

#[test]
fn test_bridge_teardown_stops_refreshes() {
    let mut window = Window::new();
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));
    let calls = Rc::new(Cell::new(0));
    let annotator = Rc::new(Annotator::new(
        &mut window,
        AnnotatorConfig::default(),
        Box::new(counting_validator(Rc::clone(&calls))),
    ));

    let mut bridge = EventBridge::new(&mut window, Rc::clone(&annotator));
    assert_eq!(calls.get(), 1);

    window
        .set_selection(id, Selection::caret(Position::new(1, 1)))
        .unwrap();
    assert_eq!(calls.get(), 2);

    bridge.dispose();
    bridge.dispose();
    assert!(bridge.is_disposed());

    window
        .set_selection(id, Selection::caret(Position::new(1, 3)))
        .unwrap();
    window.open_text_editor(TextDocument::new("b.yaml", "yaml", "#%ATL 1.0\n"));
    assert_eq!(calls.get(), 2);

    // The annotator outlives the bridge and still owns its indicator.
    assert!(!annotator.is_disposed());
    assert_eq!(window.status_bar().len(), 1);
}

#[test]
fn test_unconfigured_validator_keeps_indicator_hidden() {
    let mut window = Window::new();
    let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "#%ATL 1.0\nfoo: bar"));

    let extension = AtlExtension::activate_with_config(&mut window, AnnotatorConfig::default());

    assert!(!extension.annotator().is_indicator_visible());
    assert_eq!(window.text_editor(id).unwrap().decoration_count(), 0);
}
