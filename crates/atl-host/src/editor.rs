//! Text editors: a document shown with a selection and decorations.

use crate::decorations::{DecorationOptions, DecorationTypeId, TextEditorDecorationType};
use crate::document::TextDocument;
use crate::position::{Position, Selection};
use std::collections::BTreeMap;

/// Identifier of an open text editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditorId(pub(crate) u64);

impl EditorId {
    /// Get the raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EditorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An editor surface showing one document.
#[derive(Debug)]
pub struct TextEditor {
    id: EditorId,
    document: TextDocument,
    selection: Selection,
    decorations: BTreeMap<DecorationTypeId, Vec<DecorationOptions>>,
    decoration_calls: u64,
}

impl TextEditor {
    pub(crate) fn new(id: EditorId, document: TextDocument) -> Self {
        Self {
            id,
            document,
            selection: Selection::default(),
            decorations: BTreeMap::new(),
            decoration_calls: 0,
        }
    }

    /// This editor's id.
    pub fn id(&self) -> EditorId {
        self.id
    }

    /// The shown document.
    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    /// Mutable access to the shown document.
    pub fn document_mut(&mut self) -> &mut TextDocument {
        &mut self.document
    }

    /// The primary selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) -> bool {
        let selection = Selection::new(
            self.document.validate_position(selection.start),
            self.document.validate_position(selection.end),
        );
        if selection == self.selection {
            return false;
        }
        self.selection = selection;
        true
    }

    /// Replace the decorations of `decoration_type` with `decorations`.
    ///
    /// The previous list for that type is discarded; an empty list clears it.
    pub fn set_decorations(
        &mut self,
        decoration_type: &TextEditorDecorationType,
        decorations: Vec<DecorationOptions>,
    ) {
        self.decoration_calls = self.decoration_calls.saturating_add(1);
        if decorations.is_empty() {
            self.decorations.remove(&decoration_type.id());
        } else {
            self.decorations.insert(decoration_type.id(), decorations);
        }
    }

    /// Decorations currently applied for a decoration type, in application order.
    pub fn decorations(&self, id: DecorationTypeId) -> &[DecorationOptions] {
        self.decorations
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All decorations covering `pos`, with the type they belong to.
    pub fn decorations_at(&self, pos: Position) -> Vec<(DecorationTypeId, &DecorationOptions)> {
        self.decorations
            .iter()
            .flat_map(|(id, list)| list.iter().map(move |d| (*id, d)))
            .filter(|(_, d)| d.range.contains(pos))
            .collect()
    }

    /// Total number of decorations across all types.
    pub fn decoration_count(&self) -> usize {
        self.decorations.values().map(Vec::len).sum()
    }

    /// Number of `set_decorations` calls made on this editor.
    pub fn decoration_calls(&self) -> u64 {
        self.decoration_calls
    }
}
