//! Themed form components built on mandats_layout primitives
//!
//! Each component follows a consistent pattern:
//! - Builder function or props struct (e.g., `label("Nom")`, `SelectProps::simple(..)`)
//! - `Size` variant from the theme for padding and text presets
//! - Produces a `Div` tree; stateful widgets keep their state between renders

pub mod help;
pub mod label;
pub mod listbox;
pub mod option;
pub mod select;

pub use help::Help;
pub use label::{label, Label};
pub use listbox::{listbox_events, FocusRequest, Listbox, ListboxState, Navigation};
pub use option::{Key, LabeledOption, OptionAccessor, SimpleSelectOption};
pub use select::{
    parts, select, ListBoxPlacement, OnSelect, SelectIntent, SelectProps, SelectWidget,
    DEFAULT_EMPTY_HINT, DEFAULT_HIGHLIGHT_CLASS, LIST_BOX_OFFSET,
};
