//! Error types for mandats_cn

use mandats_layout::LayoutError;
use thiserror::Error;

use crate::components::option::Key;

/// Errors raised by selection components
///
/// The first two variants are caller contract violations; they are returned
/// before anything is rendered or any callback runs.
#[derive(Error, Debug)]
pub enum SelectError {
    /// The selected value is not one of the options
    #[error("select `{widget}` contains a selected value `{key}` that is not in options")]
    InvalidSelection { widget: String, key: Key },

    /// A chosen key no longer matches any option
    #[error("select `{widget}` could not find option `{key}` (unreachable)")]
    UnreachableLookup { widget: String, key: Key },

    /// Laying out the widget failed
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
}

/// Result type for mandats_cn operations
pub type Result<T> = std::result::Result<T, SelectError>;
