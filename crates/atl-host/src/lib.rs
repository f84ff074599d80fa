#![warn(missing_docs)]
//! ATL Host - headless model of the editor surface the ATL annotator runs against.
//!
//! # Overview
//!
//! `atl-host` models just enough of a code editor for an extension to be written and tested
//! without a GUI:
//!
//! - **Documents**: text plus a language id and path, with rope-backed offset/position mapping
//! - **Text editors**: a document shown with a selection and per-type decoration lists
//! - **Decoration types**: render options registered once, decorations applied per editor
//! - **Status bar**: owned, disposable items with text and visibility
//! - **Window events**: active-editor and selection notifications, delivered serially
//! - **Disposables**: subscriptions and items released explicitly, in groups, or on drop
//!
//! # Quick Start
//!
//! ```rust
//! use atl_host::{Disposable, Position, Selection, TextDocument, Window};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut window = Window::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&seen);
//! let mut subscription = window.on_did_change_text_editor_selection(move |_window, _event| {
//!     counter.set(counter.get() + 1);
//! });
//!
//! let id = window.open_text_editor(TextDocument::new("a.yaml", "yaml", "key: value"));
//! window
//!     .set_selection(id, Selection::caret(Position::new(0, 3)))
//!     .unwrap();
//! assert_eq!(seen.get(), 1);
//!
//! subscription.dispose();
//! window
//!     .set_selection(id, Selection::caret(Position::new(0, 1)))
//!     .unwrap();
//! assert_eq!(seen.get(), 1);
//! ```

pub mod decorations;
pub mod disposable;
pub mod document;
pub mod editor;
pub mod events;
pub mod line_index;
pub mod position;
pub mod status_bar;
pub mod window;

pub use decorations::{
    ColorThemeKind, DecorationOptions, DecorationRenderOptions, DecorationTypeId,
    OverviewRulerLane, TextDecorationLine, TextEditorDecorationType,
    ThemableDecorationRenderOptions,
};
pub use disposable::{Disposable, DisposableGroup};
pub use document::TextDocument;
pub use editor::{EditorId, TextEditor};
pub use events::{Subscription, WindowEvent, WindowEventKind, WindowListener};
pub use line_index::LineIndex;
pub use position::{Position, Range, Selection, SelectionDirection};
pub use status_bar::{StatusBar, StatusBarAlignment, StatusBarEntry, StatusBarItem, StatusBarItemId};
pub use window::Window;

/// Host-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// An editor id was not found (already closed, or never opened).
    #[error("text editor {0} not found")]
    EditorNotFound(EditorId),
}
