//! Help and error text shown under a form control

use mandats_layout::prelude::*;
use mandats_theme::{ColorToken, ThemeState};

/// Text block under a control
///
/// The error message comes first in danger color, the help text follows in
/// a muted color. Renders nothing when both are absent.
#[derive(Clone, Debug, Default)]
pub struct Help {
    id_prefix: String,
    error: Option<String>,
    help: Option<String>,
}

impl Help {
    /// `id_prefix` names the children `{prefix}-error` and `{prefix}-help`
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            ..Default::default()
        }
    }

    pub fn error(mut self, error: Option<impl Into<String>>) -> Self {
        self.error = error.map(Into::into).filter(|e: &String| !e.is_empty());
        self
    }

    pub fn help(mut self, help: Option<impl Into<String>>) -> Self {
        self.help = help.map(Into::into).filter(|h: &String| !h.is_empty());
        self
    }

    pub fn build(&self) -> Option<Div> {
        if self.error.is_none() && self.help.is_none() {
            return None;
        }
        let theme = ThemeState::get();
        let font_size = theme.typography().text_sm;

        let error = self.error.as_ref().map(|error| {
            div()
                .id(format!("{}-error", self.id_prefix))
                .class("text-sm text-danger-600")
                .attr("role", "alert")
                .child(
                    text(error)
                        .font_size(font_size)
                        .color(theme.color(ColorToken::Danger600)),
                )
        });
        let help = self.help.as_ref().map(|help| {
            div()
                .id(format!("{}-help", self.id_prefix))
                .class("text-sm text-neutral-500")
                .child(
                    text(help)
                        .font_size(font_size)
                        .color(theme.color(ColorToken::Neutral500)),
                )
        });

        Some(div().flex_col().child_opt(error).child_opt(help))
    }
}
