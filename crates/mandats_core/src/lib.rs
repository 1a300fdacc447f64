//! Mandats Core
//!
//! Foundational primitives shared by every crate of the workspace:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` in logical pixels
//! - **Color**: RGBA colors used by theme tokens
//! - **Events**: event type codes, key codes and modifiers
//! - **State Machines**: the `StateTransitions` trait driving widget interaction states
//!
//! # Example
//!
//! ```rust
//! use mandats_core::{Point, Rect};
//!
//! let button = Rect::new(10.0, 20.0, 200.0, 38.0);
//! assert_eq!(button.bottom(), 58.0);
//! assert!(button.contains(Point::new(15.0, 30.0)));
//! ```

pub mod color;
pub mod events;
pub mod fsm;
pub mod geometry;

pub use color::Color;
pub use events::{event_types, EventType, KeyCode, Modifiers};
pub use fsm::{transition, StateTransitions};
pub use geometry::{Point, Rect, Size};
