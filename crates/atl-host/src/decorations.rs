//! Text editor decorations.
//!
//! A decoration *type* is registered once with the [`Window`](crate::Window) and carries the
//! render options (underline, colors, overview ruler marker). Individual decorations are plain
//! `(range, hover message)` pairs applied per editor via
//! [`TextEditor::set_decorations`](crate::TextEditor::set_decorations), which replaces the
//! previous list for that type.

use crate::position::Range;
use std::sync::Arc;

/// Identifier of a registered decoration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationTypeId(pub u32);

/// Which lane of the overview ruler a decoration marker is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewRulerLane {
    /// Left lane.
    Left,
    /// Center lane.
    Center,
    /// Right lane.
    Right,
    /// Spans all lanes.
    Full,
}

/// Text decoration line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecorationLine {
    /// Underlined text.
    Underline,
    /// Struck-through text.
    LineThrough,
}

/// Render options that can be overridden per color theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemableDecorationRenderOptions {
    /// Text decoration line, if any.
    pub text_decoration: Option<TextDecorationLine>,
    /// Foreground color (CSS-ish color name or `#rrggbb`).
    pub color: Option<String>,
}

/// Render options for a decoration type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationRenderOptions {
    /// Text decoration line applied in every theme.
    pub text_decoration: Option<TextDecorationLine>,
    /// Overview ruler marker color.
    pub overview_ruler_color: Option<String>,
    /// Overview ruler lane.
    pub overview_ruler_lane: Option<OverviewRulerLane>,
    /// Overrides for light themes.
    pub light: Option<ThemableDecorationRenderOptions>,
    /// Overrides for dark themes.
    pub dark: Option<ThemableDecorationRenderOptions>,
}

/// Host color theme kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorThemeKind {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
}

impl DecorationRenderOptions {
    /// Resolve the effective render options for a theme (theme overrides win).
    pub fn resolve(&self, theme: ColorThemeKind) -> ThemableDecorationRenderOptions {
        let overrides = match theme {
            ColorThemeKind::Light => self.light.as_ref(),
            ColorThemeKind::Dark => self.dark.as_ref(),
        };

        ThemableDecorationRenderOptions {
            text_decoration: overrides
                .and_then(|o| o.text_decoration)
                .or(self.text_decoration),
            color: overrides.and_then(|o| o.color.clone()),
        }
    }
}

/// A registered decoration type handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditorDecorationType {
    id: DecorationTypeId,
    options: Arc<DecorationRenderOptions>,
}

impl TextEditorDecorationType {
    pub(crate) fn new(id: DecorationTypeId, options: DecorationRenderOptions) -> Self {
        Self {
            id,
            options: Arc::new(options),
        }
    }

    /// The type id.
    pub fn id(&self) -> DecorationTypeId {
        self.id
    }

    /// The render options this type was registered with.
    pub fn options(&self) -> &DecorationRenderOptions {
        &self.options
    }
}

/// A single decoration: the range it covers and an optional hover message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationOptions {
    /// Covered range.
    pub range: Range,
    /// Text shown when hovering the range.
    pub hover_message: Option<String>,
}

impl DecorationOptions {
    /// Create a decoration with a hover message.
    pub fn with_hover(range: Range, hover_message: impl Into<String>) -> Self {
        Self {
            range,
            hover_message: Some(hover_message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_theme_overrides() {
        let options = DecorationRenderOptions {
            text_decoration: Some(TextDecorationLine::Underline),
            overview_ruler_color: Some("red".to_string()),
            overview_ruler_lane: Some(OverviewRulerLane::Right),
            light: Some(ThemableDecorationRenderOptions {
                text_decoration: None,
                color: Some("darkred".to_string()),
            }),
            dark: None,
        };

        let light = options.resolve(ColorThemeKind::Light);
        assert_eq!(light.text_decoration, Some(TextDecorationLine::Underline));
        assert_eq!(light.color.as_deref(), Some("darkred"));

        let dark = options.resolve(ColorThemeKind::Dark);
        assert_eq!(dark.color, None);
    }
}
