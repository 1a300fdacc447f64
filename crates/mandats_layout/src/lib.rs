//! Mandats Layout Engine
//!
//! Flexbox layout powered by Taffy with a Tailwind-style builder API, a
//! headless window host that routes pointer and keyboard input, and the
//! popper engine that keeps popups anchored under their trigger.
//!
//! # Example
//!
//! ```rust
//! use mandats_core::{Point, Size};
//! use mandats_layout::prelude::*;
//!
//! let ui = div()
//!     .id("form")
//!     .flex_col()
//!     .gap(1.0)
//!     .child(div().id("label").child(text("Organisation")))
//!     .child(div().id("button").h(38.0).focusable());
//!
//! let tree = RenderTree::build(&ui, Size::new(320.0, 480.0), Point::ZERO).unwrap();
//! let button = tree.bounding_rect("button").unwrap();
//! assert_eq!(button.width(), 320.0);
//! assert_eq!(button.height(), 38.0);
//! ```

pub mod div;
pub mod element;
pub mod event_handler;
pub mod event_router;
pub mod popper;
pub mod renderer;
pub mod tree;
pub mod window;

// Core types
pub use div::{div, text, Div};
pub use element::{CursorStyle, ElementBounds, FontWeight, RenderProps, TextContent};
pub use event_handler::{EventCallback, EventContext, EventHandlers};
pub use event_router::EventRouter;
pub use popper::{
    ElementGeometry, Placement, PopupState, PopupStyle, Popper, PositionStrategy,
    PositioningConfig,
};
pub use renderer::{RenderLayer, RenderNode, RenderTree};
pub use tree::{LayoutError, LayoutNodeId, LayoutTree};
pub use window::{Window, WindowEvent, WindowListener};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::div::{div, text, Div};
    pub use crate::element::{CursorStyle, ElementBounds, FontWeight, RenderProps};
    // Event handlers
    pub use crate::event_handler::{EventCallback, EventContext, EventHandlers};
    // Event routing
    pub use crate::event_router::EventRouter;
    // Floating positioning
    pub use crate::popper::{
        ElementGeometry, Placement, PopupState, PopupStyle, Popper, PositioningConfig,
    };
    pub use crate::renderer::{RenderLayer, RenderTree};
    pub use crate::tree::{LayoutError, LayoutNodeId};
    pub use crate::window::{Window, WindowEvent};
}
