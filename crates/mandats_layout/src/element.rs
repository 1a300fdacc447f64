//! Element-level render properties

use mandats_core::{Color, Rect};
use taffy::Layout;

/// Computed layout bounds for an element after layout computation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBounds {
    /// X position (parent offset applied)
    pub x: f32,
    /// Y position (parent offset applied)
    pub y: f32,
    /// Computed width
    pub width: f32,
    /// Computed height
    pub height: f32,
}

impl ElementBounds {
    /// Create bounds from a Taffy Layout with parent offset
    pub fn from_layout(layout: &Layout, parent_offset: (f32, f32)) -> Self {
        Self {
            x: parent_offset.0 + layout.location.x,
            y: parent_offset.1 + layout.location.y,
            width: layout.size.width,
            height: layout.size.height,
        }
    }

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to a mandats_core Rect
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Mouse cursor shown over an element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
    NotAllowed,
}

/// Font weight of a text element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Medium,
    Semibold,
}

/// Text payload of a text element
#[derive(Clone, Debug, PartialEq)]
pub struct TextContent {
    pub content: String,
    pub font_size: f32,
    pub weight: FontWeight,
    pub color: Color,
}

/// Visual properties that do not affect layout
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderProps {
    pub background: Option<Color>,
    /// Border width and color
    pub border: Option<(f32, Color)>,
    pub radius: f32,
    pub shadow: bool,
    pub cursor: CursorStyle,
    /// Laid out but neither painted nor hit-tested
    pub invisible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_to_rect() {
        let bounds = ElementBounds::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(bounds.to_rect(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
