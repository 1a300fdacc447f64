//! Label component - styled text label for form elements
//!
//! # Example
//!
//! ```rust
//! use mandats_cn::prelude::*;
//!
//! // Required field label
//! let el = cn::label("Organisation").id("org-label").required(true).build();
//! assert_eq!(el.text_content(), "Organisation *");
//!
//! // Kept for assistive technology only
//! let el = cn::label("Search").hidden(true).build();
//! assert!(el.has_class("sr-only"));
//! ```

use mandats_layout::prelude::*;
use mandats_theme::{ColorToken, ThemeState};

/// Styled Label component
#[derive(Clone, Debug)]
pub struct Label {
    text: String,
    id: Option<String>,
    required: bool,
    disabled: bool,
    hidden: bool,
}

impl Label {
    /// Create a new label with the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: None,
            required: false,
            disabled: false,
            hidden: false,
        }
    }

    /// Element id, referenced by `aria-labelledby`
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark the label as required (shows asterisk)
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Dimmed appearance
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Visually hidden but still present for assistive technology
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn build(&self) -> Div {
        let theme = ThemeState::get();
        let font_size = theme.typography().text_sm;

        let (color_class, text_color) = if self.disabled {
            ("text-neutral-500", theme.color(ColorToken::Neutral500))
        } else {
            ("text-neutral-700", theme.color(ColorToken::Neutral700))
        };

        let mut el = div()
            .flex_row()
            .items_baseline()
            .class("block text-sm font-semibold")
            .class(color_class)
            .child(
                text(&self.text)
                    .font_size(font_size)
                    .color(text_color)
                    .semibold(),
            );

        if self.required {
            el = el.child(
                text(" *")
                    .font_size(font_size)
                    .color(theme.color(ColorToken::Warning600)),
            );
        }

        if let Some(id) = &self.id {
            el = el.id(id);
        }

        if self.hidden {
            el = el.class("sr-only").absolute().size(1.0, 1.0).invisible();
        }

        el
    }
}

/// Create a styled label component
pub fn label(text: impl Into<String>) -> Label {
    Label::new(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_label() {
        let el = label("Nom").id("name-label").build();
        assert_eq!(el.element_id(), Some("name-label"));
        assert_eq!(el.text_content(), "Nom");
        assert!(el.has_class("text-neutral-700"));
        assert!(!el.render_props().invisible);
    }

    #[test]
    fn test_required_asterisk_uses_warning_color() {
        let el = label("Nom").required(true).build();
        let asterisk = el.child_elements().last().and_then(|c| c.text()).unwrap();
        assert_eq!(asterisk.content, " *");
        assert_eq!(
            asterisk.color,
            ThemeState::get().color(ColorToken::Warning600)
        );
    }

    #[test]
    fn test_disabled_and_hidden() {
        let el = label("Nom").disabled(true).hidden(true).build();
        assert!(el.has_class("text-neutral-500"));
        assert!(el.has_class("sr-only"));
        assert!(el.render_props().invisible);
        assert_eq!(el.text_content(), "Nom");
    }
}
