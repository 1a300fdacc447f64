//! Feed page rendering

use mandats_layout::prelude::*;
use mandats_theme::{ColorToken, RadiusToken, ThemeState};

use crate::feed::Mandat;

const ICON_SIZE: f32 = 32.0;

/// The feed: one item per mandat, status icon on the left
pub fn feed_view(mandats: &[Mandat]) -> Div {
    div()
        .id("feed")
        .class("mx-auto flex max-w-2xl items-center")
        .flex_col()
        .gap(8.0)
        .p(4.0)
        .children(mandats.iter().enumerate().map(|(i, m)| feed_item(i, m)))
}

fn feed_item(index: usize, mandat: &Mandat) -> Div {
    let theme = ThemeState::get();
    let typography = theme.typography();
    let status = mandat.status();

    let icon = div()
        .class("flex h-8 w-8 items-center justify-center rounded-full")
        .size(ICON_SIZE, ICON_SIZE)
        .flex_shrink_0()
        .items_center()
        .rounded(ICON_SIZE / 2.0)
        .bg(theme.color(status.background))
        .child(
            text(status.icon.glyph())
                .font_size(typography.text_base)
                .color(theme.color(ColorToken::TextInverse)),
        );

    let link = mandat.link.as_ref().map(|href| {
        div()
            .class("inline-flex rounded-md border bg-white px-3 py-2 shadow-sm")
            .attr("href", href)
            .attr("target", "_blank")
            .border(1.0, theme.color(ColorToken::Neutral300))
            .rounded(theme.radius(RadiusToken::Md))
            .p(2.0)
            .cursor_pointer()
            .child(text("Voir le mandat").font_size(typography.text_sm))
    });

    let description = div()
        .class("flex flex-col gap-2")
        .flex_col()
        .gap(2.0)
        .child(
            text(&mandat.org)
                .font_size(typography.text_sm)
                .color(theme.color(ColorToken::Neutral500)),
        )
        .child_opt(link);

    div()
        .id(format!("mandat-{index}"))
        .attr("data-key", mandat.key())
        .attr("data-state", &mandat.state)
        .flex_row()
        .items_start()
        .gap(3.0)
        .child(icon)
        .child(
            div()
                .flex_col()
                .flex_1()
                .gap(1.0)
                .child(
                    text(mandat.title())
                        .font_size(typography.text_sm)
                        .color(theme.color(ColorToken::Neutral900))
                        .semibold(),
                )
                .child(description),
        )
}
