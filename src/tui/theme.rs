//! Theme system for consistent UI colors across dark and light modes.
//!
//! The chrome colors come from the theme. Character accents come from the
//! catalog and are converted with `RgbColor::to_ratatui_color`.

use ratatui::style::Color;

use crate::config::ThemeMode;

/// Semantic color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Primary UI colors
    /// Borders, nav links, section titles
    pub primary: Color,
    /// Highlights and the current nav link
    pub accent: Color,

    // Text hierarchy
    /// Primary text content color
    pub text: Color,
    /// Labels and less important content
    pub text_secondary: Color,
    /// Hints, footers, dim content
    pub text_muted: Color,

    // Backgrounds
    /// Page background
    pub background: Color,
    /// Picker backdrop
    pub backdrop: Color,
    /// Picker panel and cards
    pub surface: Color,
}

impl Theme {
    /// Detects the OS theme and returns the appropriate Theme.
    ///
    /// Falls back to dark when the mode can't be detected.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// Theme for a configured mode. `Auto` asks the OS.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Dark theme for dark terminal backgrounds.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,

            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            background: Color::Black,
            backdrop: Color::Rgb(12, 12, 12),
            surface: Color::Rgb(30, 30, 30),
        }
    }

    /// Light theme for light terminal backgrounds.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0), // Dark orange for visibility

            text: Color::Black,
            text_secondary: Color::Rgb(60, 60, 60),
            text_muted: Color::Gray,

            background: Color::White,
            backdrop: Color::Rgb(200, 200, 200),
            surface: Color::Rgb(245, 245, 245),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}

/// Blends `from` toward `to`; `amount` 0 is `from`, 1 is `to`.
///
/// Non-RGB colors can't be blended and switch over at the halfway point.
#[must_use]
pub fn blend(from: Color, to: Color, amount: f32) -> Color {
    let amount = amount.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| {
                (f32::from(a) + (f32::from(b) - f32::from(a)) * amount).round() as u8
            };
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if amount < 0.5 => from,
        _ => to,
    }
}
