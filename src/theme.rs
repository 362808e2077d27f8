use iced::Color;
use serde::{Deserialize, Serialize};

// ─── THEME VARIANTS ─────────────────────────────────────────────

/// The two display themes the settings file recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Light,
    Dark,
}

impl ThemeVariant {
    pub const ALL: &[ThemeVariant] = &[ThemeVariant::Light, ThemeVariant::Dark];

    pub fn name(&self) -> &'static str {
        match self {
            ThemeVariant::Light => "Light",
            ThemeVariant::Dark => "Dark",
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, ThemeVariant::Light)
    }
}

impl Default for ThemeVariant {
    fn default() -> Self {
        ThemeVariant::Light
    }
}

// ─── PALETTE ────────────────────────────────────────────────────

/// All semantic colors the app uses, derived from the theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub panel_bg: Color,
    pub sidebar_bg: Color,
    pub border: Color,
    pub grid: Color,
    pub label: Color,
    pub text: Color,
    pub bar_bg: Color,
    // Signal colors
    pub accent: Color,
    pub green: Color,
    pub red: Color,
    pub yellow: Color,
    pub cyan: Color,
    pub magenta: Color,
    pub blue: Color,
}

pub fn build_palette(theme: ThemeVariant) -> Palette {
    match theme {
        ThemeVariant::Light => Palette {
            bg:         hex(0xf4, 0xf5, 0xf7),
            panel_bg:   hex(0xeb, 0xec, 0xf0),
            sidebar_bg: hex(0xdf, 0xe1, 0xe7),
            border:     hex(0xc9, 0xcc, 0xd4),
            grid:       Color::from_rgba(0.0, 0.0, 0.0, 0.06),
            label:      hex(0x68, 0x6d, 0x7c),
            text:       hex(0x2b, 0x2f, 0x3a),
            bar_bg:     hex(0xc9, 0xcc, 0xd4),
            accent:     hex(0x2a, 0x66, 0xc4),
            green:      hex(0x2e, 0x8b, 0x3a),
            red:        hex(0xc0, 0x2f, 0x34),
            yellow:     hex(0xb5, 0x7d, 0x12),
            cyan:       hex(0x0e, 0x87, 0xa8),
            magenta:    hex(0x8a, 0x3f, 0xa8),
            blue:       hex(0x2a, 0x66, 0xc4),
        },
        ThemeVariant::Dark => Palette {
            bg:         hex(0x1c, 0x1f, 0x26),
            panel_bg:   hex(0x16, 0x18, 0x1e),
            sidebar_bg: hex(0x10, 0x12, 0x17),
            border:     hex(0x32, 0x36, 0x40),
            grid:       Color::from_rgba(1.0, 1.0, 1.0, 0.06),
            label:      hex(0x8d, 0x94, 0xa6),
            text:       hex(0xd8, 0xdc, 0xe5),
            bar_bg:     hex(0x32, 0x36, 0x40),
            accent:     hex(0x6c, 0xa3, 0xf0),
            green:      hex(0x85, 0xc8, 0x7e),
            red:        hex(0xe2, 0x72, 0x72),
            yellow:     hex(0xe5, 0xbe, 0x7a),
            cyan:       hex(0x78, 0xc4, 0xd8),
            magenta:    hex(0xbd, 0x93, 0xd8),
            blue:       hex(0x6c, 0xa3, 0xf0),
        },
    }
}

const fn hex(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}
