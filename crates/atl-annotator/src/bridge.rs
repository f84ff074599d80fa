//! Wiring window events to [`Annotator::refresh`].

use crate::annotator::Annotator;
use atl_host::{Disposable, DisposableGroup, Window, WindowEvent};
use std::rc::Rc;

/// Keeps an [`Annotator`] in sync with the window.
///
/// Every selection change and every active editor change triggers a full refresh of the active
/// editor. Events are not filtered or debounced.
#[derive(Debug)]
pub struct EventBridge {
    subscriptions: DisposableGroup,
}

impl EventBridge {
    /// Refresh once for the current state, then subscribe to window events.
    pub fn new(window: &mut Window, annotator: Rc<Annotator>) -> Self {
        annotator.refresh(window.active_text_editor_mut());

        let on_selection = window.on_did_change_text_editor_selection(refresh_on_event(
            Rc::clone(&annotator),
        ));
        let on_active = window.on_did_change_active_text_editor(refresh_on_event(annotator));

        Self {
            subscriptions: DisposableGroup::from_all([
                Box::new(on_selection) as Box<dyn Disposable>,
                Box::new(on_active),
            ]),
        }
    }
}

fn refresh_on_event(annotator: Rc<Annotator>) -> impl FnMut(&mut Window, &WindowEvent) + 'static {
    move |window, event| {
        tracing::trace!(?event, "window event");
        annotator.refresh(window.active_text_editor_mut());
    }
}

impl Disposable for EventBridge {
    fn dispose(&mut self) {
        self.subscriptions.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.subscriptions.is_disposed()
    }
}
