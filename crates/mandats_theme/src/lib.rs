//! Mandats Theme
//!
//! Design tokens shared by the components: a tailwind-like color palette,
//! typography sizes, radii and the closed set of control sizes.
//!
//! ```rust
//! use mandats_theme::{ColorToken, ThemeState};
//!
//! let theme = ThemeState::get();
//! let primary = theme.color(ColorToken::Primary600);
//! assert_eq!(primary.to_hex_string(), "#2563eb");
//! ```

mod size;
mod tokens;

pub use size::Size;
pub use tokens::{ColorToken, RadiusToken, Theme, TypographyTokens};

use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Global access to the active theme
pub struct ThemeState;

impl ThemeState {
    /// Install a theme before the first `get()`
    ///
    /// Returns false (and keeps the current theme) when a theme is already active.
    pub fn init(theme: Theme) -> bool {
        let installed = THEME.set(theme).is_ok();
        if !installed {
            tracing::warn!("ThemeState::init called after the theme was already set");
        }
        installed
    }

    /// Get the active theme, installing the default light theme on first use
    pub fn get() -> &'static Theme {
        THEME.get_or_init(Theme::light)
    }
}
