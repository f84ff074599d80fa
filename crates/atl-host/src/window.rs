//! The host window: open text editors, the active editor, the status bar, registered
//! decoration types and event listeners.
//!
//! # Event delivery
//!
//! Events are delivered synchronously to every listener registered for their kind, in
//! registration order. Events raised while listeners are running (for example a listener that
//! moves the selection) are queued and delivered once the current event has reached every
//! listener, so a listener is never re-entered.

use crate::decorations::{DecorationRenderOptions, DecorationTypeId, TextEditorDecorationType};
use crate::document::TextDocument;
use crate::editor::{EditorId, TextEditor};
use crate::events::{ListenerRegistry, Subscription, WindowEvent, WindowEventKind};
use crate::position::Selection;
use crate::status_bar::{StatusBar, StatusBarAlignment, StatusBarItem};
use crate::{ColorThemeKind, HostError};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// The host window.
pub struct Window {
    next_editor_id: u64,
    editors: BTreeMap<EditorId, TextEditor>,
    /// Editors in tab order.
    order: Vec<EditorId>,
    active: Option<EditorId>,

    status_bar: StatusBar,

    next_decoration_type_id: u32,
    decoration_types: BTreeMap<DecorationTypeId, TextEditorDecorationType>,
    color_theme: ColorThemeKind,

    listeners: Rc<RefCell<ListenerRegistry>>,
    pending: VecDeque<WindowEvent>,
    dispatching: bool,
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("editor_count", &self.editors.len())
            .field("active", &self.active)
            .field("decoration_type_count", &self.decoration_types.len())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl Window {
    /// Create an empty window.
    pub fn new() -> Self {
        Self {
            next_editor_id: 0,
            editors: BTreeMap::new(),
            order: Vec::new(),
            active: None,
            status_bar: StatusBar::new(),
            next_decoration_type_id: 0,
            decoration_types: BTreeMap::new(),
            color_theme: ColorThemeKind::Dark,
            listeners: Rc::new(RefCell::new(ListenerRegistry::default())),
            pending: VecDeque::new(),
            dispatching: false,
        }
    }

    // ----- editors -------------------------------------------------------------------------

    /// Open a document in a new editor and make it the active editor.
    pub fn open_text_editor(&mut self, document: TextDocument) -> EditorId {
        self.next_editor_id = self.next_editor_id.saturating_add(1);
        let id = EditorId(self.next_editor_id);
        tracing::trace!(editor = id.get(), file = %document.file_name().display(), "open text editor");

        self.editors.insert(id, TextEditor::new(id, document));
        self.order.push(id);
        self.activate(Some(id));
        id
    }

    /// Close an editor. If it was active, the previous editor in tab order (or the next one)
    /// becomes active.
    pub fn close_text_editor(&mut self, id: EditorId) -> Result<(), HostError> {
        if self.editors.remove(&id).is_none() {
            return Err(HostError::EditorNotFound(id));
        }

        let index = self.order.iter().position(|e| *e == id);
        self.order.retain(|e| *e != id);

        if self.active == Some(id) {
            let next = index.and_then(|i| {
                self.order
                    .get(i.saturating_sub(1))
                    .or_else(|| self.order.first())
                    .copied()
            });
            self.activate(next);
        }
        Ok(())
    }

    /// Focus an editor, or no editor at all.
    pub fn set_active_text_editor(&mut self, id: Option<EditorId>) -> Result<(), HostError> {
        if let Some(id) = id
            && !self.editors.contains_key(&id)
        {
            return Err(HostError::EditorNotFound(id));
        }
        self.activate(id);
        Ok(())
    }

    /// Move focus to the next (or previous) editor in tab order, wrapping around.
    pub fn cycle_active_text_editor(&mut self, forward: bool) {
        if self.order.is_empty() {
            return;
        }
        let len = self.order.len();
        let current = self
            .active
            .and_then(|id| self.order.iter().position(|e| *e == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.activate(Some(self.order[next]));
    }

    fn activate(&mut self, id: Option<EditorId>) {
        if self.active == id {
            return;
        }
        self.active = id;
        self.fire(WindowEvent::ActiveTextEditorChanged { editor: id });
    }

    /// Change an editor's primary selection. Positions are clamped to the document.
    pub fn set_selection(&mut self, id: EditorId, selection: Selection) -> Result<(), HostError> {
        let editor = self
            .editors
            .get_mut(&id)
            .ok_or(HostError::EditorNotFound(id))?;

        if editor.set_selection(selection) {
            let selection = editor.selection();
            self.fire(WindowEvent::TextEditorSelectionChanged {
                editor: id,
                selection,
            });
        }
        Ok(())
    }

    /// The active editor's id.
    pub fn active_text_editor_id(&self) -> Option<EditorId> {
        self.active
    }

    /// The active editor.
    pub fn active_text_editor(&self) -> Option<&TextEditor> {
        self.active.and_then(|id| self.editors.get(&id))
    }

    /// The active editor, mutably.
    pub fn active_text_editor_mut(&mut self) -> Option<&mut TextEditor> {
        self.active.and_then(|id| self.editors.get_mut(&id))
    }

    /// Look up an editor.
    pub fn text_editor(&self, id: EditorId) -> Option<&TextEditor> {
        self.editors.get(&id)
    }

    /// Look up an editor, mutably.
    pub fn text_editor_mut(&mut self, id: EditorId) -> Option<&mut TextEditor> {
        self.editors.get_mut(&id)
    }

    /// Open editors in tab order.
    pub fn visible_text_editors(&self) -> impl Iterator<Item = &TextEditor> {
        self.order.iter().filter_map(|id| self.editors.get(id))
    }

    // ----- status bar / decorations ---------------------------------------------------------

    /// The status bar.
    pub fn status_bar(&self) -> &StatusBar {
        &self.status_bar
    }

    /// Create a (hidden) status bar item owned by the caller.
    pub fn create_status_bar_item(
        &self,
        alignment: StatusBarAlignment,
        priority: i32,
    ) -> StatusBarItem {
        self.status_bar.create_item(alignment, priority)
    }

    /// Register a decoration type.
    pub fn create_text_editor_decoration_type(
        &mut self,
        options: DecorationRenderOptions,
    ) -> TextEditorDecorationType {
        self.next_decoration_type_id = self.next_decoration_type_id.saturating_add(1);
        let id = DecorationTypeId(self.next_decoration_type_id);
        let decoration_type = TextEditorDecorationType::new(id, options);
        self.decoration_types.insert(id, decoration_type.clone());
        decoration_type
    }

    /// Look up a registered decoration type.
    pub fn decoration_type(&self, id: DecorationTypeId) -> Option<&TextEditorDecorationType> {
        self.decoration_types.get(&id)
    }

    /// The current color theme kind.
    pub fn color_theme(&self) -> ColorThemeKind {
        self.color_theme
    }

    /// Switch the color theme kind.
    pub fn set_color_theme(&mut self, theme: ColorThemeKind) {
        self.color_theme = theme;
    }

    // ----- events -------------------------------------------------------------------------

    /// Listen for active editor changes.
    pub fn on_did_change_active_text_editor<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&mut Window, &WindowEvent) + 'static,
    {
        self.subscribe(WindowEventKind::ActiveTextEditorChanged, listener)
    }

    /// Listen for selection changes in any editor.
    pub fn on_did_change_text_editor_selection<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&mut Window, &WindowEvent) + 'static,
    {
        self.subscribe(WindowEventKind::TextEditorSelectionChanged, listener)
    }

    fn subscribe<F>(&mut self, kind: WindowEventKind, listener: F) -> Subscription
    where
        F: FnMut(&mut Window, &WindowEvent) + 'static,
    {
        let id = self.listeners.borrow_mut().add(kind, Box::new(listener));
        Subscription::new(id, &self.listeners)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Raise an event.
    pub fn fire(&mut self, event: WindowEvent) {
        self.pending.push_back(event);
        if self.dispatching {
            return;
        }

        self.dispatching = true;
        while let Some(event) = self.pending.pop_front() {
            self.dispatch(&event);
        }
        self.dispatching = false;
    }

    fn dispatch(&mut self, event: &WindowEvent) {
        let kind = event.kind();
        let mut checked_out = self.listeners.borrow_mut().begin_dispatch();
        tracing::trace!(?kind, listeners = checked_out.len(), "dispatch window event");

        for entry in checked_out.iter_mut() {
            if entry.kind() != kind || self.listeners.borrow().is_removed(entry.id()) {
                continue;
            }
            entry.call(self, event);
        }

        let removed = self.listeners.borrow_mut().end_dispatch(checked_out);
        drop(removed);
    }
}
