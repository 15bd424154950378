//! Hero section: the shield entrance and the headline around it.
//!
//! Positions are computed in hero-local cells with the origin at the top-left
//! of the full hero, so the same layout serves drawing (possibly scrolled) and
//! mouse hit testing.

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use super::theme::{blend, Theme};
use crate::animation::presets::LANDING;
use crate::animation::{Element, EntranceSequencer, ViewportSize, VisualState};
use crate::branding::{
    CTA_GALLERY, CTA_REGISTER, HERO_HEADLINE, HERO_NUMERAL, HERO_QUOTE, HERO_TAG, HERO_TAGLINE,
};
use crate::models::RgbColor;

/// Nominal pixel width of a terminal cell.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Nominal pixel height of a terminal cell.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Smallest hero that can hold the largest shield glyph.
const MIN_WIDTH: u16 = 24;
const MIN_HEIGHT: u16 = 12;

const SPINNER: [char; 4] = ['│', '╱', '─', '╲'];

const SHIELD_LARGE: [&str; 5] = ["╭─────╮", "│ ╭─╮ │", "│ │★│ │", "│ ╰─╯ │", "╰─────╯"];
const SHIELD_MEDIUM: [&str; 3] = ["╭───╮", "│ ★ │", "╰───╯"];
const SHIELD_SMALL: [&str; 1] = ["◎"];

/// Pixel viewport the entrance script resolves against for a hero area.
#[must_use]
pub fn viewport_size(width: u16, height: u16) -> ViewportSize {
    ViewportSize::new(
        f32::from(width) * CELL_WIDTH_PX,
        f32::from(height) * CELL_HEIGHT_PX,
    )
}

fn px_to_cols(px: f32) -> i32 {
    (px / CELL_WIDTH_PX).round() as i32
}

fn px_to_rows(px: f32) -> i32 {
    (px / CELL_HEIGHT_PX).round() as i32
}

/// Shield glyph for a scale.
#[must_use]
pub fn shield_glyph(scale: f32) -> &'static [&'static str] {
    if scale >= 1.2 {
        &SHIELD_LARGE
    } else if scale >= 0.7 {
        &SHIELD_MEDIUM
    } else {
        &SHIELD_SMALL
    }
}

/// Spinner frame for a rotation in degrees.
#[must_use]
pub fn spinner_frame(rotation: f32) -> char {
    let step = (rotation.rem_euclid(180.0) / 45.0).floor() as usize;
    SPINNER[step % SPINNER.len()]
}

/// Resting positions of the hero content, in hero-local cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroLayout {
    /// Full hero size
    pub width: u16,
    /// Full hero height
    pub height: u16,
    /// Center column
    pub center_col: i32,
    /// Center row
    pub center_row: i32,
    /// Landing cell of the shield, beside the numeral
    pub landing: (i32, i32),
    /// Row of the floating tag
    pub tag_row: i32,
    /// Row of the quote; the tagline sits below it
    pub quote_row: i32,
    /// Row of the call-to-action buttons
    pub buttons_row: i32,
    /// First column and width of the register button
    pub register: (i32, i32),
    /// First column and width of the gallery button
    pub gallery: (i32, i32),
}

fn width_of(text: &str) -> i32 {
    text.chars().count() as i32
}

fn button_label(label: &str) -> String {
    format!("[ {label} ]")
}

impl HeroLayout {
    /// Layout for a hero of `width` x `height` cells.
    #[must_use]
    pub fn compute(width: u16, height: u16) -> Self {
        let center_col = i32::from(width) / 2;
        let center_row = i32::from(height) / 2;
        let viewport = viewport_size(width, height);
        let landing = (
            center_col + px_to_cols(LANDING.x.to_px(viewport)),
            center_row + px_to_rows(LANDING.y.to_px(viewport)),
        );

        let register_width = width_of(&button_label(CTA_REGISTER));
        let gallery_width = width_of(&button_label(CTA_GALLERY));
        let gap = 3;
        let register_col = center_col - (register_width + gap + gallery_width) / 2;

        Self {
            width,
            height,
            center_col,
            center_row,
            landing,
            tag_row: landing.1 - 3,
            quote_row: landing.1 + 3,
            buttons_row: landing.1 + 6,
            register: (register_col, register_width),
            gallery: (register_col + register_width + gap, gallery_width),
        }
    }

    /// Whether the hero is big enough to hold the shield.
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.width >= MIN_WIDTH && self.height >= MIN_HEIGHT
    }

    /// Whether a hero-local cell is on the gallery button.
    #[must_use]
    pub fn gallery_hit(&self, col: i32, row: i32) -> bool {
        row == self.buttons_row && (self.gallery.0..self.gallery.0 + self.gallery.1).contains(&col)
    }
}

/// Clipped writer from hero-local cells into a screen area.
struct Canvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    first_row: u16,
}

impl Canvas<'_> {
    fn put(&mut self, col: i32, row: i32, text: &str, style: Style) {
        let screen_row = i32::from(self.area.y) + row - i32::from(self.first_row);
        if screen_row < i32::from(self.area.y) || screen_row >= i32::from(self.area.bottom()) {
            return;
        }
        for (index, ch) in text.chars().enumerate() {
            let screen_col = i32::from(self.area.x) + col + index as i32;
            if screen_col < i32::from(self.area.x) || screen_col >= i32::from(self.area.right()) {
                continue;
            }
            if let Some(cell) = self.buf.cell_mut((screen_col as u16, screen_row as u16)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }

    /// Text centered on `col`, narrowed by `scale` from both ends.
    fn put_scaled(&mut self, col: i32, row: i32, text: &str, scale: f32, style: Style) {
        let chars: Vec<char> = text.chars().collect();
        let shown = ((chars.len() as f32) * scale.clamp(0.0, 1.0)).round() as usize;
        if shown == 0 {
            return;
        }
        let skip = (chars.len() - shown) / 2;
        let visible: String = chars[skip..skip + shown].iter().collect();
        self.put(col - width_of(&visible) / 2, row, &visible, style);
    }
}

/// Everything the hero draws from.
pub struct HeroView<'a> {
    /// Entrance sequencer driving the shield and content
    pub sequencer: &'a EntranceSequencer,
    /// Shield tint, the equipped character's color
    pub shield_color: RgbColor,
    /// Clock reading for this frame
    pub now: Duration,
    /// Theme colors
    pub theme: &'a Theme,
}

impl HeroView<'_> {
    fn fade(&self, color: Color, state: &VisualState) -> Color {
        blend(self.theme.background, color, state.visible_opacity())
    }

    /// Draws rows `first_row..` of a hero of `full_height` rows into `area`.
    ///
    /// Returns true when the shield had room to be drawn.
    pub fn render(&self, buf: &mut Buffer, area: Rect, first_row: u16, full_height: u16) -> bool {
        let layout = HeroLayout::compute(area.width, full_height);
        let viewport = viewport_size(area.width, full_height);
        let sample = |element| self.sequencer.sample(element, self.now, viewport);
        let mut canvas = Canvas {
            buf,
            area,
            first_row,
        };

        // Tag
        let tag = sample(Element::Tag);
        if tag.is_visible() {
            let style = Style::default()
                .fg(self.fade(self.theme.accent, &tag))
                .add_modifier(Modifier::BOLD);
            canvas.put_scaled(layout.center_col, layout.tag_row, HERO_TAG, tag.scale, style);
        }

        // Headline word, ending just before the numeral
        let (landing_col, landing_row) = layout.landing;
        let numeral_col = landing_col - width_of(HERO_NUMERAL) - 1;
        let headline = sample(Element::Headline);
        if headline.is_visible() {
            let style = Style::default()
                .fg(self.fade(self.theme.text, &headline))
                .add_modifier(Modifier::BOLD);
            let col = numeral_col - width_of(HERO_HEADLINE) - 1 + px_to_cols(headline.x);
            canvas.put(col, landing_row, HERO_HEADLINE, style);
        }

        let numeral = sample(Element::Numeral);
        if numeral.is_visible() {
            let style = Style::default()
                .fg(self.fade(self.theme.primary, &numeral))
                .add_modifier(Modifier::BOLD);
            let center = numeral_col + width_of(HERO_NUMERAL) / 2;
            canvas.put_scaled(center, landing_row, HERO_NUMERAL, numeral.scale, style);
        }

        // Quote and tagline
        let subtext = sample(Element::Subtext);
        if subtext.is_visible() {
            let row = layout.quote_row + px_to_rows(subtext.y);
            let quote = Style::default()
                .fg(self.fade(self.theme.text, &subtext))
                .add_modifier(Modifier::ITALIC);
            let tagline = Style::default().fg(self.fade(self.theme.text_secondary, &subtext));
            canvas.put(layout.center_col - width_of(HERO_QUOTE) / 2, row, HERO_QUOTE, quote);
            canvas.put(
                layout.center_col - width_of(HERO_TAGLINE) / 2,
                row + 1,
                HERO_TAGLINE,
                tagline,
            );
        }

        // Buttons
        let buttons = sample(Element::Buttons);
        if buttons.is_visible() {
            let row = layout.buttons_row + px_to_rows(buttons.y);
            let register = Style::default()
                .fg(self.fade(self.theme.background, &buttons))
                .bg(self.fade(self.theme.accent, &buttons))
                .add_modifier(Modifier::BOLD);
            let gallery = Style::default().fg(self.fade(self.theme.primary, &buttons));
            canvas.put(layout.register.0, row, &button_label(CTA_REGISTER), register);
            canvas.put(layout.gallery.0, row, &button_label(CTA_GALLERY), gallery);
        }

        if !layout.has_room() {
            return false;
        }

        // Shield last, on top of everything it flies over
        let shield = sample(Element::Shield);
        if shield.is_visible() {
            let glyph = shield_glyph(shield.scale);
            let glyph_width = width_of(glyph[0]);
            let glyph_height = glyph.len() as i32;
            let col = layout.center_col + px_to_cols(shield.x);
            let row = layout.center_row + px_to_rows(shield.y);
            let color = self.fade(self.shield_color.to_ratatui_color(), &shield);
            let style = Style::default().fg(color).add_modifier(Modifier::BOLD);

            for (index, line) in glyph.iter().enumerate() {
                canvas.put(
                    col - glyph_width / 2,
                    row - glyph_height / 2 + index as i32,
                    line,
                    style,
                );
            }
            if glyph.len() > 1 {
                let marker = spinner_frame(shield.rotation).to_string();
                canvas.put(col + glyph_width / 2 + 1, row, &marker, style);
            }
        }

        true
    }
}
