//! Floating positioning for popups anchored to a reference element
//!
//! A `Popper` keeps a popup glued under a reference element (a select
//! button, a menu trigger). Positions are viewport-relative, so the popup is
//! rendered in the fixed layer:
//!
//! ```text
//!  ┌──────────── reference ────────────┐
//!  └───────────────────────────────────┘
//!        ↕ offset
//!  ┌──────────── popup ────────────────┐   bottom-start, same width
//!  │                                   │
//!  └───────────────────────────────────┘
//! ```
//!
//! The popper only recomputes when something could have moved the anchor:
//! an element was attached or detached, the window scrolled or resized, or
//! the reference element changed size. Callers feed the frame geometry in
//! through [`ElementGeometry`].
//!
//! ```rust
//! use mandats_core::Rect;
//! use mandats_layout::popper::{ElementGeometry, Placement, Popper, PositioningConfig};
//!
//! struct Frame;
//! impl ElementGeometry for Frame {
//!     fn bounding_rect(&self, id: &str) -> Option<Rect> {
//!         match id {
//!             "button" => Some(Rect::new(10.0, 20.0, 200.0, 38.0)),
//!             "menu" => Some(Rect::new(0.0, 0.0, 120.0, 80.0)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut popper = Popper::new(
//!     PositioningConfig::new(Placement::BottomStart).offset(5.0).same_width(true),
//! );
//! popper.set_reference_element(Some("button".into()));
//! popper.set_popup_element(Some("menu".into()));
//!
//! let state = popper.recompute(&Frame).unwrap();
//! assert_eq!((state.style.left, state.style.top), (10.0, 63.0));
//! assert_eq!(state.style.width, Some(200.0));
//! ```

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use mandats_core::{Rect, Size};

use crate::div::Div;

/// Attribute carrying the resolved placement on the popup element
pub const PLACEMENT_ATTRIBUTE: &str = "data-popper-placement";

/// Source of element geometry (viewport-relative bounding boxes)
pub trait ElementGeometry {
    /// Bounding box of the element with `id`, if it is attached
    fn bounding_rect(&self, id: &str) -> Option<Rect>;
}

/// Where the popup sits relative to its reference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Below, left edges aligned
    #[default]
    BottomStart,
    /// Below, right edges aligned
    BottomEnd,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::BottomStart => "bottom-start",
            Placement::BottomEnd => "bottom-end",
        }
    }
}

/// Coordinate space of the computed position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositionStrategy {
    /// Relative to the viewport, unaffected by document scroll
    #[default]
    Fixed,
}

/// Positioning configuration, fixed for the lifetime of a popper
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositioningConfig {
    pub placement: Placement,
    /// Gap between the reference's bottom edge and the popup's top edge
    pub offset: f32,
    /// Force the popup width to the reference width on every recompute
    pub same_width: bool,
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            placement: Placement::BottomStart,
            offset: 0.0,
            same_width: false,
        }
    }
}

impl PositioningConfig {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            ..Default::default()
        }
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn same_width(mut self, same_width: bool) -> Self {
        self.same_width = same_width;
        self
    }
}

/// Computed popup placement (whole pixels)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopupStyle {
    pub strategy: PositionStrategy,
    pub left: f32,
    pub top: f32,
    /// Set when the popup must match the reference width
    pub width: Option<f32>,
}

impl PopupStyle {
    /// Place `popup` in the fixed layer at the computed position
    pub fn apply(&self, popup: Div) -> Div {
        let popup = popup.fixed_at(self.left, self.top);
        match self.width {
            Some(width) => popup.w(width),
            None => popup,
        }
    }
}

/// Result of a positioning pass
#[derive(Clone, Debug, PartialEq)]
pub struct PopupState {
    pub style: PopupStyle,
    /// Attributes to set on the popup element
    pub attributes: IndexMap<String, String>,
}

/// Anchors a popup element to a reference element
#[derive(Debug)]
pub struct Popper {
    config: PositioningConfig,
    reference: Option<String>,
    popup: Option<String>,
    state: Option<PopupState>,
    /// Shared so window listeners can invalidate without borrowing the popper
    dirty: Rc<Cell<bool>>,
    /// Reference size seen by the last observation
    observed_size: Option<Size>,
}

impl Popper {
    pub fn new(config: PositioningConfig) -> Self {
        Self {
            config,
            reference: None,
            popup: None,
            state: None,
            dirty: Rc::new(Cell::new(false)),
            observed_size: None,
        }
    }

    pub fn config(&self) -> &PositioningConfig {
        &self.config
    }

    pub fn reference_element(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn popup_element(&self) -> Option<&str> {
        self.popup.as_deref()
    }

    /// Attach or detach the reference element
    pub fn set_reference_element(&mut self, id: Option<String>) {
        if self.reference != id {
            tracing::debug!(reference = ?id, "popper reference changed");
            self.reference = id;
            self.observed_size = None;
            self.invalidate();
        }
    }

    /// Attach or detach the popup element
    pub fn set_popup_element(&mut self, id: Option<String>) {
        if self.popup != id {
            tracing::debug!(popup = ?id, "popper popup changed");
            self.popup = id;
            self.invalidate();
        }
    }

    /// Handle to the dirty flag, for scroll and resize listeners
    pub fn invalidation_handle(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.dirty)
    }

    /// Request a recompute on the next `update`
    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Resize observer: invalidate when the reference changed size
    ///
    /// Returns true when a size change was observed.
    pub fn observe(&mut self, geometry: &dyn ElementGeometry) -> bool {
        let Some(reference) = self.reference.as_deref() else {
            return false;
        };
        let size = geometry.bounding_rect(reference).map(|r| r.size());
        if size.is_some() && size != self.observed_size {
            let first = self.observed_size.is_none();
            self.observed_size = size;
            if !first {
                tracing::debug!(reference, ?size, "reference resized");
            }
            self.invalidate();
            return true;
        }
        false
    }

    /// Recompute if a trigger fired since the last pass
    ///
    /// Returns true when the popup state changed.
    pub fn update(&mut self, geometry: &dyn ElementGeometry) -> bool {
        self.observe(geometry);
        if !self.is_dirty() {
            return false;
        }
        let before = self.state.clone();
        self.recompute(geometry);
        before != self.state
    }

    /// Compute the popup position from current geometry
    ///
    /// Yields `None` while either element is missing.
    pub fn recompute(&mut self, geometry: &dyn ElementGeometry) -> Option<&PopupState> {
        self.dirty.set(false);
        self.state = self.compute(geometry);
        if let Some(state) = &self.state {
            tracing::debug!(
                placement = self.config.placement.as_str(),
                left = state.style.left,
                top = state.style.top,
                width = ?state.style.width,
                "popper positioned"
            );
        }
        self.state.as_ref()
    }

    fn compute(&mut self, geometry: &dyn ElementGeometry) -> Option<PopupState> {
        let reference = geometry.bounding_rect(self.reference.as_deref()?)?;
        let popup = geometry.bounding_rect(self.popup.as_deref()?)?;
        self.observed_size = Some(reference.size());

        let width = self.config.same_width.then(|| reference.width());
        let popup_width = width.unwrap_or(popup.width());

        let left = match self.config.placement {
            Placement::BottomStart => reference.x(),
            Placement::BottomEnd => reference.right() - popup_width,
        };
        let top = reference.bottom() + self.config.offset;

        let mut attributes = IndexMap::new();
        attributes.insert(
            PLACEMENT_ATTRIBUTE.to_string(),
            self.config.placement.as_str().to_string(),
        );

        Some(PopupState {
            style: PopupStyle {
                strategy: PositionStrategy::Fixed,
                left: left.round(),
                top: top.round(),
                width: width.map(f32::round),
            },
            attributes,
        })
    }

    /// Last computed state
    pub fn state(&self) -> Option<&PopupState> {
        self.state.as_ref()
    }

    pub fn style(&self) -> Option<&PopupStyle> {
        self.state.as_ref().map(|s| &s.style)
    }

    /// Detach both elements and forget the last position
    pub fn reset(&mut self) {
        self.reference = None;
        self.popup = None;
        self.state = None;
        self.observed_size = None;
        self.dirty.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct Frame(FxHashMap<&'static str, Rect>);

    impl Frame {
        fn with(mut self, id: &'static str, rect: Rect) -> Self {
            self.0.insert(id, rect);
            self
        }
    }

    impl ElementGeometry for Frame {
        fn bounding_rect(&self, id: &str) -> Option<Rect> {
            self.0.get(id).copied()
        }
    }

    fn attached(config: PositioningConfig) -> Popper {
        let mut popper = Popper::new(config);
        popper.set_reference_element(Some("ref".into()));
        popper.set_popup_element(Some("pop".into()));
        popper
    }

    #[test]
    fn test_bottom_start_same_width() {
        let frame = Frame::default()
            .with("ref", Rect::new(12.0, 40.0, 240.0, 38.0))
            .with("pop", Rect::new(0.0, 0.0, 90.0, 120.0));
        let mut popper = attached(
            PositioningConfig::new(Placement::BottomStart)
                .offset(5.0)
                .same_width(true),
        );

        let state = popper.recompute(&frame).unwrap();
        assert_eq!(state.style.left, 12.0);
        assert_eq!(state.style.top, 83.0);
        assert_eq!(state.style.width, Some(240.0));
        assert_eq!(state.style.strategy, PositionStrategy::Fixed);
        assert_eq!(
            state.attributes.get(PLACEMENT_ATTRIBUTE).map(String::as_str),
            Some("bottom-start")
        );
    }

    #[test]
    fn test_bottom_end_aligns_right_edges() {
        let frame = Frame::default()
            .with("ref", Rect::new(100.0, 0.0, 200.0, 30.0))
            .with("pop", Rect::new(0.0, 0.0, 80.0, 50.0));
        let mut popper = attached(PositioningConfig::new(Placement::BottomEnd));

        let style = popper.recompute(&frame).unwrap().style;
        assert_eq!(style.left, 220.0);
        assert_eq!(style.top, 30.0);
        assert_eq!(style.width, None);

        let mut popper = attached(PositioningConfig::new(Placement::BottomEnd).same_width(true));
        let style = popper.recompute(&frame).unwrap().style;
        assert_eq!(style.left, 100.0);
    }

    #[test]
    fn test_missing_element_yields_no_position() {
        let frame = Frame::default().with("ref", Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut popper = attached(PositioningConfig::default());
        assert!(popper.recompute(&frame).is_none());
        assert!(popper.style().is_none());

        let mut detached = Popper::new(PositioningConfig::default());
        assert!(detached.recompute(&frame).is_none());
    }

    #[test]
    fn test_recompute_is_idempotent_and_rounded() {
        let frame = Frame::default()
            .with("ref", Rect::new(10.4, 20.6, 199.7, 30.2))
            .with("pop", Rect::new(0.0, 0.0, 50.0, 50.0));
        let mut popper = attached(
            PositioningConfig::new(Placement::BottomStart)
                .offset(5.0)
                .same_width(true),
        );

        let first = popper.recompute(&frame).cloned();
        let second = popper.recompute(&frame).cloned();
        assert_eq!(first, second);
        let style = first.unwrap().style;
        assert_eq!((style.left, style.top, style.width), (10.0, 56.0, Some(200.0)));
    }

    #[test]
    fn test_update_only_on_triggers() {
        let frame = Frame::default()
            .with("ref", Rect::new(0.0, 0.0, 100.0, 20.0))
            .with("pop", Rect::new(0.0, 0.0, 100.0, 60.0));
        let mut popper = attached(PositioningConfig::new(Placement::BottomStart).same_width(true));
        assert!(popper.is_dirty());
        assert!(popper.update(&frame));
        assert!(!popper.is_dirty());

        // Unrelated frame: nothing to do
        assert!(!popper.update(&frame));

        // Scroll listener invalidates through the shared handle
        let handle = popper.invalidation_handle();
        handle.set(true);
        let scrolled = Frame::default()
            .with("ref", Rect::new(0.0, -30.0, 100.0, 20.0))
            .with("pop", Rect::new(0.0, 0.0, 100.0, 60.0));
        assert!(popper.update(&scrolled));
        assert_eq!(popper.style().map(|s| s.top), Some(-10.0));
    }

    #[test]
    fn test_resize_observer_tracks_reference_width() {
        let frame = Frame::default()
            .with("ref", Rect::new(0.0, 0.0, 100.0, 20.0))
            .with("pop", Rect::new(0.0, 0.0, 100.0, 60.0));
        let mut popper = attached(PositioningConfig::new(Placement::BottomStart).same_width(true));
        popper.update(&frame);

        let wider = Frame::default()
            .with("ref", Rect::new(0.0, 0.0, 180.0, 20.0))
            .with("pop", Rect::new(0.0, 0.0, 100.0, 60.0));
        assert!(popper.observe(&wider));
        assert!(popper.update(&wider));
        assert_eq!(popper.style().and_then(|s| s.width), Some(180.0));
    }

    #[test]
    fn test_apply_places_popup_in_fixed_layer() {
        let style = PopupStyle {
            strategy: PositionStrategy::Fixed,
            left: 4.0,
            top: 9.0,
            width: Some(70.0),
        };
        let popup = style.apply(Div::new());
        assert_eq!(popup.fixed_position(), Some(mandats_core::Point::new(4.0, 9.0)));
        assert_eq!(popup.style().size.width, taffy::prelude::Dimension::Length(70.0));
    }
}
