//! Status bar items.
//!
//! The [`StatusBar`] is owned by the [`Window`](crate::Window); extensions own the
//! [`StatusBarItem`] handles they create. Item state lives in the bar so renderers can read it,
//! while the handle is the only way to change it.

use crate::disposable::Disposable;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Identifier of a status bar item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusBarItemId(u64);

/// Which side of the status bar an item is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusBarAlignment {
    /// Left side.
    Left,
    /// Right side.
    Right,
}

/// Render-facing state of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBarEntry {
    /// Item id.
    pub id: StatusBarItemId,
    /// Placement.
    pub alignment: StatusBarAlignment,
    /// Higher priorities are placed further towards the outer edge.
    pub priority: i32,
    /// Label.
    pub text: String,
    /// Optional tooltip.
    pub tooltip: Option<String>,
    /// Whether the item is shown.
    pub visible: bool,
}

#[derive(Default)]
struct Items {
    next_id: u64,
    entries: BTreeMap<StatusBarItemId, StatusBarEntry>,
}

/// The host status bar.
#[derive(Default)]
pub struct StatusBar {
    items: Rc<RefCell<Items>>,
}

impl StatusBar {
    /// Create an empty status bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, hidden item.
    pub fn create_item(&self, alignment: StatusBarAlignment, priority: i32) -> StatusBarItem {
        let mut items = self.items.borrow_mut();
        items.next_id = items.next_id.saturating_add(1);
        let id = StatusBarItemId(items.next_id);
        items.entries.insert(
            id,
            StatusBarEntry {
                id,
                alignment,
                priority,
                text: String::new(),
                tooltip: None,
                visible: false,
            },
        );

        StatusBarItem {
            id,
            items: Rc::downgrade(&self.items),
            disposed: false,
        }
    }

    /// Visible items in display order: left items first (highest priority first), then right
    /// items (lowest priority first).
    pub fn visible_items(&self) -> Vec<StatusBarEntry> {
        let items = self.items.borrow();
        let mut visible: Vec<StatusBarEntry> = items
            .entries
            .values()
            .filter(|e| e.visible)
            .cloned()
            .collect();
        visible.sort_by(|a, b| match (a.alignment, b.alignment) {
            (StatusBarAlignment::Left, StatusBarAlignment::Left) => b.priority.cmp(&a.priority),
            (StatusBarAlignment::Right, StatusBarAlignment::Right) => a.priority.cmp(&b.priority),
            _ => a.alignment.cmp(&b.alignment),
        });
        visible
    }

    /// Look up an item's current state.
    pub fn entry(&self, id: StatusBarItemId) -> Option<StatusBarEntry> {
        self.items.borrow().entries.get(&id).cloned()
    }

    /// Number of live (not disposed) items.
    pub fn len(&self) -> usize {
        self.items.borrow().entries.len()
    }

    /// Whether the bar has no live items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for StatusBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBar")
            .field("item_count", &self.len())
            .finish()
    }
}

/// An owned handle to a status bar item.
///
/// Updates after disposal are ignored. Dropping the handle disposes the item.
#[must_use = "dropping a StatusBarItem removes it from the status bar"]
pub struct StatusBarItem {
    id: StatusBarItemId,
    items: Weak<RefCell<Items>>,
    disposed: bool,
}

impl StatusBarItem {
    /// The item id.
    pub fn id(&self) -> StatusBarItemId {
        self.id
    }

    fn update(&self, f: impl FnOnce(&mut StatusBarEntry)) {
        if self.disposed {
            return;
        }
        if let Some(items) = self.items.upgrade()
            && let Some(entry) = items.borrow_mut().entries.get_mut(&self.id)
        {
            f(entry);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&StatusBarEntry) -> T) -> Option<T> {
        let items = self.items.upgrade()?;
        let items = items.borrow();
        items.entries.get(&self.id).map(f)
    }

    /// Show the item.
    pub fn show(&self) {
        self.update(|e| e.visible = true);
    }

    /// Hide the item.
    pub fn hide(&self) {
        self.update(|e| e.visible = false);
    }

    /// Set the label.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|e| e.text = text);
    }

    /// Set or clear the tooltip.
    pub fn set_tooltip(&self, tooltip: Option<String>) {
        self.update(|e| e.tooltip = tooltip);
    }

    /// Current label (empty once disposed).
    pub fn text(&self) -> String {
        self.read(|e| e.text.clone()).unwrap_or_default()
    }

    /// Whether the item is currently shown.
    pub fn is_visible(&self) -> bool {
        self.read(|e| e.visible).unwrap_or(false)
    }
}

impl Disposable for StatusBarItem {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(items) = self.items.upgrade() {
            items.borrow_mut().entries.remove(&self.id);
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for StatusBarItem {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for StatusBarItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBarItem")
            .field("id", &self.id)
            .field("disposed", &self.disposed)
            .finish()
    }
}
