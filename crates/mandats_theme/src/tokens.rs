//! Token definitions

use mandats_core::Color;

/// Semantic color slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorToken {
    /// Control surfaces (buttons, popups)
    Surface,
    Primary500,
    Primary600,
    Neutral300,
    Neutral400,
    Neutral500,
    Neutral700,
    Neutral900,
    Danger300,
    Danger500,
    Danger600,
    Warning500,
    Warning600,
    Success500,
    Success600,
    TextInverse,
}

/// Typography sizes in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypographyTokens {
    pub text_xs: f32,
    pub text_sm: f32,
    pub text_base: f32,
    /// Line height multiplier
    pub leading: f32,
}

impl Default for TypographyTokens {
    fn default() -> Self {
        Self {
            text_xs: 12.0,
            text_sm: 14.0,
            text_base: 16.0,
            leading: 1.25,
        }
    }
}

/// Corner radius slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RadiusToken {
    Sm,
    Md,
    Lg,
}

/// A complete theme
#[derive(Clone, Debug)]
pub struct Theme {
    name: &'static str,
    typography: TypographyTokens,
    palette: fn(ColorToken) -> Color,
}

impl Theme {
    /// The default light palette
    pub fn light() -> Self {
        Self {
            name: "light",
            typography: TypographyTokens::default(),
            palette: light_palette,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn color(&self, token: ColorToken) -> Color {
        (self.palette)(token)
    }

    pub fn typography(&self) -> TypographyTokens {
        self.typography
    }

    pub fn radius(&self, token: RadiusToken) -> f32 {
        match token {
            RadiusToken::Sm => 2.0,
            RadiusToken::Md => 6.0,
            RadiusToken::Lg => 8.0,
        }
    }
}

fn light_palette(token: ColorToken) -> Color {
    match token {
        ColorToken::Surface | ColorToken::TextInverse => Color::WHITE,
        ColorToken::Primary500 => Color::from_hex(0x3B82F6),
        ColorToken::Primary600 => Color::from_hex(0x2563EB),
        ColorToken::Neutral300 => Color::from_hex(0xD4D4D4),
        ColorToken::Neutral400 => Color::from_hex(0xA3A3A3),
        ColorToken::Neutral500 => Color::from_hex(0x737373),
        ColorToken::Neutral700 => Color::from_hex(0x404040),
        ColorToken::Neutral900 => Color::from_hex(0x171717),
        ColorToken::Danger300 => Color::from_hex(0xFCA5A5),
        ColorToken::Danger500 => Color::from_hex(0xEF4444),
        ColorToken::Danger600 => Color::from_hex(0xDC2626),
        ColorToken::Warning500 => Color::from_hex(0xF59E0B),
        ColorToken::Warning600 => Color::from_hex(0xD97706),
        ColorToken::Success500 => Color::from_hex(0x22C55E),
        ColorToken::Success600 => Color::from_hex(0x16A34A),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_palette_lookup() {
        let theme = Theme::light();
        assert_eq!(theme.color(ColorToken::Surface), Color::WHITE);
        assert_eq!(
            theme.color(ColorToken::Danger600).to_hex_string(),
            "#dc2626"
        );
    }

    #[test]
    fn test_typography_defaults() {
        let typography = Theme::light().typography();
        assert_eq!(typography.text_xs, 12.0);
        assert_eq!(typography.text_sm, 14.0);
        assert_eq!(typography.text_base, 16.0);
    }
}
