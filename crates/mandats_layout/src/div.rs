//! Tailwind-style div builder
//!
//! Provides a fluent builder API for creating layout elements:
//! ```rust
//! use mandats_layout::prelude::*;
//! use mandats_core::Color;
//!
//! let ui = div()
//!     .id("card")
//!     .flex_col()
//!     .gap(2.0)
//!     .p(2.0)
//!     .bg(Color::WHITE)
//!     .child(text("Hello"));
//!
//! assert_eq!(ui.text_content(), "Hello");
//! ```
//!
//! Spacing helpers taking `units` use a 4px base unit like Tailwind
//! (`p(2.0)` is 8px); the `_px` variants take pixels.

use indexmap::IndexMap;
use mandats_core::{Color, EventType, Point, event_types};
use taffy::prelude::{
    AlignItems, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage,
    LengthPercentageAuto, Position, Style,
};

use crate::element::{CursorStyle, FontWeight, RenderProps, TextContent};
use crate::event_handler::{EventContext, EventHandlers};

/// Default text size when none is given
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// A div element builder
#[derive(Clone, Debug, Default)]
pub struct Div {
    id: Option<String>,
    style: Style,
    classes: Vec<String>,
    attributes: IndexMap<String, String>,
    text: Option<TextContent>,
    props: RenderProps,
    /// Viewport position when laid out in the fixed layer
    fixed: Option<Point>,
    focusable: bool,
    auto_focus: bool,
    handlers: EventHandlers,
    children: Vec<Div>,
}

impl Div {
    /// Create a new div element
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Identity & semantics
    // =========================================================================

    /// Set the element id (used for lookup, hit results and focus)
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class name; whitespace separated lists are split
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        for name in class.as_ref().split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    /// Add a class only when `condition` holds
    pub fn class_if(self, condition: bool, class: impl AsRef<str>) -> Self {
        if condition {
            self.class(class)
        } else {
            self
        }
    }

    /// Set an attribute (`role`, `aria-*`, `data-*`)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Merge a set of attributes, later values win
    pub fn attrs<'a>(
        mut self,
        attributes: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        for (name, value) in attributes {
            self.attributes.insert(name.clone(), value.clone());
        }
        self
    }

    /// Accept keyboard focus
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Request focus when the tree is mounted
    pub fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        if auto_focus {
            self.focusable = true;
        }
        self
    }

    // =========================================================================
    // Display & Flex
    // =========================================================================

    pub fn flex(mut self) -> Self {
        self.style.display = Display::Flex;
        self
    }

    pub fn block(mut self) -> Self {
        self.style.display = Display::Block;
        self
    }

    /// Remove the element from layout
    pub fn hidden(mut self) -> Self {
        self.style.display = Display::None;
        self
    }

    pub fn flex_row(mut self) -> Self {
        self.style.display = Display::Flex;
        self.style.flex_direction = FlexDirection::Row;
        self
    }

    pub fn flex_col(mut self) -> Self {
        self.style.display = Display::Flex;
        self.style.flex_direction = FlexDirection::Column;
        self
    }

    /// Grow and shrink from a zero basis
    pub fn flex_1(mut self) -> Self {
        self.style.flex_grow = 1.0;
        self.style.flex_shrink = 1.0;
        self.style.flex_basis = Dimension::Length(0.0);
        self
    }

    pub fn flex_shrink_0(mut self) -> Self {
        self.style.flex_shrink = 0.0;
        self
    }

    pub fn items_center(mut self) -> Self {
        self.style.align_items = Some(AlignItems::Center);
        self
    }

    pub fn items_start(mut self) -> Self {
        self.style.align_items = Some(AlignItems::FlexStart);
        self
    }

    pub fn items_baseline(mut self) -> Self {
        self.style.align_items = Some(AlignItems::Baseline);
        self
    }

    pub fn justify_between(mut self) -> Self {
        self.style.justify_content = Some(JustifyContent::SpaceBetween);
        self
    }

    // =========================================================================
    // Sizing (pixel values)
    // =========================================================================

    pub fn w(mut self, px: f32) -> Self {
        self.style.size.width = Dimension::Length(px);
        self
    }

    pub fn w_full(mut self) -> Self {
        self.style.size.width = Dimension::Percent(1.0);
        self
    }

    pub fn h(mut self, px: f32) -> Self {
        self.style.size.height = Dimension::Length(px);
        self
    }

    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.style.size.width = Dimension::Length(w);
        self.style.size.height = Dimension::Length(h);
        self
    }

    pub fn max_h(mut self, px: f32) -> Self {
        self.style.max_size.height = Dimension::Length(px);
        self
    }

    // =========================================================================
    // Spacing (4px base unit like Tailwind)
    // =========================================================================

    /// Set gap between children (in 4px units)
    pub fn gap(self, units: f32) -> Self {
        self.gap_px(units * 4.0)
    }

    pub fn gap_px(mut self, px: f32) -> Self {
        self.style.gap = taffy::Size {
            width: LengthPercentage::Length(px),
            height: LengthPercentage::Length(px),
        };
        self
    }

    /// Set padding on all sides (in 4px units)
    pub fn p(self, units: f32) -> Self {
        self.p_px(units * 4.0)
    }

    pub fn p_px(mut self, px: f32) -> Self {
        let val = LengthPercentage::Length(px);
        self.style.padding = taffy::Rect {
            left: val,
            right: val,
            top: val,
            bottom: val,
        };
        self
    }

    /// Set vertical padding (in 4px units)
    pub fn py(mut self, units: f32) -> Self {
        let px = LengthPercentage::Length(units * 4.0);
        self.style.padding.top = px;
        self.style.padding.bottom = px;
        self
    }

    /// Set left padding (in 4px units)
    pub fn pl(mut self, units: f32) -> Self {
        self.style.padding.left = LengthPercentage::Length(units * 4.0);
        self
    }

    /// Set right padding (in 4px units)
    pub fn pr(mut self, units: f32) -> Self {
        self.style.padding.right = LengthPercentage::Length(units * 4.0);
        self
    }

    /// Set bottom margin in pixels
    pub fn mb_px(mut self, px: f32) -> Self {
        self.style.margin.bottom = LengthPercentageAuto::Length(px);
        self
    }

    // =========================================================================
    // Positioning
    // =========================================================================

    pub fn absolute(mut self) -> Self {
        self.style.position = Position::Absolute;
        self
    }

    pub fn relative(mut self) -> Self {
        self.style.position = Position::Relative;
        self
    }

    pub fn top(mut self, px: f32) -> Self {
        self.style.inset.top = LengthPercentageAuto::Length(px);
        self
    }

    pub fn bottom(mut self, px: f32) -> Self {
        self.style.inset.bottom = LengthPercentageAuto::Length(px);
        self
    }

    pub fn left(mut self, px: f32) -> Self {
        self.style.inset.left = LengthPercentageAuto::Length(px);
        self
    }

    pub fn right(mut self, px: f32) -> Self {
        self.style.inset.right = LengthPercentageAuto::Length(px);
        self
    }

    /// Place the element in the fixed layer at a viewport position
    ///
    /// Fixed elements are laid out separately against the viewport and do
    /// not move when the document scrolls. Event bubbling still follows the
    /// element's place in the tree.
    pub fn fixed_at(mut self, x: f32, y: f32) -> Self {
        self.fixed = Some(Point::new(x, y));
        self
    }

    // =========================================================================
    // Visual Properties
    // =========================================================================

    pub fn bg(mut self, color: Color) -> Self {
        self.props.background = Some(color);
        self
    }

    pub fn border(mut self, width: f32, color: Color) -> Self {
        self.props.border = Some((width, color));
        self.style.border = taffy::Rect {
            left: LengthPercentage::Length(width),
            right: LengthPercentage::Length(width),
            top: LengthPercentage::Length(width),
            bottom: LengthPercentage::Length(width),
        };
        self
    }

    pub fn rounded(mut self, radius: f32) -> Self {
        self.props.radius = radius;
        self
    }

    pub fn shadow_lg(mut self) -> Self {
        self.props.shadow = true;
        self
    }

    pub fn cursor(mut self, cursor: CursorStyle) -> Self {
        self.props.cursor = cursor;
        self
    }

    pub fn cursor_pointer(self) -> Self {
        self.cursor(CursorStyle::Pointer)
    }

    /// Keep layout but skip painting and hit testing
    pub fn invisible(mut self) -> Self {
        self.props.invisible = true;
        self
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Set the font size of a text element
    pub fn font_size(mut self, size: f32) -> Self {
        if let Some(text) = self.text.as_mut() {
            text.font_size = size;
        }
        self.update_text_size();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        if let Some(text) = self.text.as_mut() {
            text.color = color;
        }
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        if let Some(text) = self.text.as_mut() {
            text.weight = weight;
        }
        self
    }

    pub fn semibold(self) -> Self {
        self.weight(FontWeight::Semibold)
    }

    /// Size a text leaf from its content
    ///
    /// Rough estimate: average character width is ~0.5 * font_size and
    /// line height is 1.25 * font_size.
    fn update_text_size(&mut self) {
        if let Some(text) = &self.text {
            let char_count = text.content.chars().count() as f32;
            self.style.size.width = Dimension::Length(char_count * text.font_size * 0.5);
            self.style.size.height = Dimension::Length(text.font_size * 1.25);
            self.style.flex_shrink = 0.0;
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a handler for any event type
    pub fn on_event<F>(mut self, event_type: EventType, handler: F) -> Self
    where
        F: Fn(&EventContext) + 'static,
    {
        self.handlers.on(event_type, handler);
        self
    }

    pub fn on_click<F>(self, handler: F) -> Self
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on_event(event_types::CLICK, handler)
    }

    pub fn on_key_down<F>(self, handler: F) -> Self
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on_event(event_types::KEY_DOWN, handler)
    }

    pub fn on_blur<F>(self, handler: F) -> Self
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on_event(event_types::BLUR, handler)
    }

    pub fn on_hover_enter<F>(self, handler: F) -> Self
    where
        F: Fn(&EventContext) + 'static,
    {
        self.on_event(event_types::POINTER_ENTER, handler)
    }

    // =========================================================================
    // Children
    // =========================================================================

    pub fn child(mut self, child: Div) -> Self {
        self.children.push(child);
        self
    }

    /// Add a child only when present
    pub fn child_opt(self, child: Option<Div>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Div>) -> Self {
        self.children.extend(children);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn text(&self) -> Option<&TextContent> {
        self.text.as_ref()
    }

    pub fn render_props(&self) -> &RenderProps {
        &self.props
    }

    pub fn fixed_position(&self) -> Option<Point> {
        self.fixed
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn wants_focus(&self) -> bool {
        self.auto_focus
    }

    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    pub fn child_elements(&self) -> &[Div] {
        &self.children
    }

    /// Concatenated text of this element and its descendants, in tree order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(&text.content);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search for an element by id
    pub fn find(&self, id: &str) -> Option<&Div> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// All descendants (and self) matching `predicate`, in tree order
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&Div) -> bool) -> Vec<&'a Div> {
        let mut out = Vec::new();
        self.collect_matching(predicate, &mut out);
        out
    }

    fn collect_matching<'a>(&'a self, predicate: &dyn Fn(&Div) -> bool, out: &mut Vec<&'a Div>) {
        if predicate(self) {
            out.push(self);
        }
        for child in &self.children {
            child.collect_matching(predicate, out);
        }
    }
}

/// Convenience function to create a new div
pub fn div() -> Div {
    Div::new()
}

/// Create a text leaf
pub fn text(content: impl Into<String>) -> Div {
    let mut leaf = Div::new();
    leaf.text = Some(TextContent {
        content: content.into(),
        font_size: DEFAULT_FONT_SIZE,
        weight: FontWeight::Normal,
        color: Color::BLACK,
    });
    leaf.update_text_size();
    leaf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_size_estimate() {
        let leaf = text("abcd").font_size(10.0);
        assert_eq!(leaf.style().size.width, Dimension::Length(20.0));
        assert_eq!(leaf.style().size.height, Dimension::Length(12.5));
    }

    #[test]
    fn test_class_dedup_and_split() {
        let el = div().class("a b").class("b c").class_if(false, "d");
        assert_eq!(el.classes(), &["a", "b", "c"]);
        assert!(el.has_class("c"));
        assert!(!el.has_class("d"));
    }

    #[test]
    fn test_find_and_text_content() {
        let ui = div()
            .id("root")
            .child(div().id("row-1").child(text("A")))
            .child(div().id("row-2").child(text("B")));

        assert_eq!(ui.text_content(), "AB");
        assert_eq!(ui.find("row-2").map(|d| d.text_content()), Some("B".into()));
        assert!(ui.find("row-3").is_none());
    }

    #[test]
    fn test_find_all() {
        let ui = div()
            .child(div().attr("role", "option"))
            .child(div().attr("role", "option"))
            .child(div().attr("role", "presentation"));
        let options = ui.find_all(&|d| d.attribute("role") == Some("option"));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_auto_focus_implies_focusable() {
        let el = div().auto_focus(true);
        assert!(el.is_focusable());
        assert!(el.wants_focus());
    }
}
