//! Window events and listener subscriptions.

use crate::Window;
use crate::disposable::Disposable;
use crate::editor::EditorId;
use crate::position::Selection;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

/// A notification raised by the [`Window`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// The active text editor changed (`None` when no editor is focused).
    ActiveTextEditorChanged {
        /// The newly active editor.
        editor: Option<EditorId>,
    },
    /// The selection of a text editor changed.
    TextEditorSelectionChanged {
        /// The editor whose selection changed.
        editor: EditorId,
        /// The new primary selection.
        selection: Selection,
    },
}

/// The kind of a [`WindowEvent`], used to route it to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    /// See [`WindowEvent::ActiveTextEditorChanged`].
    ActiveTextEditorChanged,
    /// See [`WindowEvent::TextEditorSelectionChanged`].
    TextEditorSelectionChanged,
}

impl WindowEvent {
    /// The routing kind of this event.
    pub fn kind(&self) -> WindowEventKind {
        match self {
            Self::ActiveTextEditorChanged { .. } => WindowEventKind::ActiveTextEditorChanged,
            Self::TextEditorSelectionChanged { .. } => WindowEventKind::TextEditorSelectionChanged,
        }
    }
}

/// Listener callback type.
///
/// Listeners run on the window's event thread and receive the window itself, so they can read
/// the active editor and update it.
pub type WindowListener = Box<dyn FnMut(&mut Window, &WindowEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(u64);

pub(crate) struct ListenerEntry {
    id: ListenerId,
    kind: WindowEventKind,
    callback: WindowListener,
}

impl ListenerEntry {
    pub(crate) fn id(&self) -> ListenerId {
        self.id
    }

    pub(crate) fn kind(&self) -> WindowEventKind {
        self.kind
    }

    pub(crate) fn call(&mut self, window: &mut Window, event: &WindowEvent) {
        (self.callback)(window, event);
    }
}

/// Listener storage shared between the window and its [`Subscription`] handles.
///
/// While the window is dispatching, the listener list is checked out of the registry; removals
/// made during that time are remembered so the checked-out entries can be skipped and dropped.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<ListenerEntry>,
    dispatching: bool,
    removed_during_dispatch: HashSet<ListenerId>,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, kind: WindowEventKind, callback: WindowListener) -> ListenerId {
        self.next_id = self.next_id.saturating_add(1);
        let id = ListenerId(self.next_id);
        self.listeners.push(ListenerEntry { id, kind, callback });
        id
    }

    /// Unregister a listener, handing back the removed entry so the caller can drop it after
    /// releasing the registry borrow (callbacks may own other handles).
    fn remove(&mut self, id: ListenerId) -> Vec<ListenerEntry> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(|entry| entry.id == id);
        self.listeners = kept;
        if self.dispatching {
            self.removed_during_dispatch.insert(id);
        }
        removed
    }

    pub(crate) fn is_removed(&self, id: ListenerId) -> bool {
        self.removed_during_dispatch.contains(&id)
    }

    pub(crate) fn begin_dispatch(&mut self) -> Vec<ListenerEntry> {
        self.dispatching = true;
        std::mem::take(&mut self.listeners)
    }

    /// Return the checked-out listeners; entries unregistered meanwhile are handed back.
    pub(crate) fn end_dispatch(&mut self, checked_out: Vec<ListenerEntry>) -> Vec<ListenerEntry> {
        let added = std::mem::take(&mut self.listeners);
        let removed_ids = std::mem::take(&mut self.removed_during_dispatch);
        let (removed, kept): (Vec<_>, Vec<_>) = checked_out
            .into_iter()
            .partition(|entry| removed_ids.contains(&entry.id));
        self.listeners = kept.into_iter().chain(added).collect();
        self.dispatching = false;
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

/// Handle to a registered window listener.
///
/// Disposing (or dropping) the handle unregisters the listener. A listener unregistered while
/// an event is being dispatched is not called for the remainder of that dispatch.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    id: Option<ListenerId>,
    registry: Weak<RefCell<ListenerRegistry>>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, registry: &Rc<RefCell<ListenerRegistry>>) -> Self {
        Self {
            id: Some(id),
            registry: Rc::downgrade(registry),
        }
    }
}

impl Disposable for Subscription {
    fn dispose(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(registry) = self.registry.upgrade() {
            let removed = registry.borrow_mut().remove(id);
            drop(removed);
        }
    }

    fn is_disposed(&self) -> bool {
        self.id.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.id.is_none())
            .finish()
    }
}
