//! # Mandats Component Library (mandats_cn)
//!
//! Form components for the mandats site, built on `mandats_layout` primitives.
//!
//! - **Primitives**: `mandats_layout` provides the building blocks (div, text, window, popper)
//! - **Theme Tokens**: `mandats_theme` provides design tokens (colors, typography, sizes)
//! - **Components**: `mandats_cn` provides styled components that use theme tokens
//!
//! ## Example
//!
//! ```rust
//! use mandats_cn::prelude::*;
//!
//! let props = SelectProps::simple(vec![
//!     LabeledOption::new(1, "Mende"),
//!     LabeledOption::new(2, "Marvejols"),
//! ])
//! .label("Ville")
//! .size(Size::Small)
//! .clearable(true);
//!
//! let mut select = SelectWidget::new("city");
//! let el = select.render(&props).unwrap();
//! assert!(el.find("city-button").is_some());
//! ```
//!
//! ## Components
//!
//! - **Label** - Form label with required marker and visually hidden mode
//! - **Help** - Error and help text under a control
//! - **Select** - Single-value select with a floating option list

pub mod components;
pub mod error;

pub use components::*;
pub use error::{Result, SelectError};

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::label::label;
    pub use crate::components::select::select;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::help::Help;
    pub use crate::components::label::{label, Label};
    pub use crate::components::option::{Key, LabeledOption, OptionAccessor, SimpleSelectOption};
    pub use crate::components::select::{
        ListBoxPlacement, SelectIntent, SelectProps, SelectWidget,
    };
    pub use crate::error::SelectError;
    // Re-export commonly needed theme types
    pub use mandats_theme::{ColorToken, Size, ThemeState};
}
