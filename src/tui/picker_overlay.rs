//! Character picker overlay.
//!
//! [`PickerLayout`] places the panel, close button and card grid for a screen
//! area. Rendering and mouse hit testing both use it, so what is clicked is
//! what was drawn at rest. Reveal offsets only shift the drawing.

use std::time::Duration;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::hero::{viewport_size, CELL_HEIGHT_PX};
use super::theme::{blend, Theme};
use crate::animation::{Element, VisualState};
use crate::branding::{picker_title, PICKER_FOOTER, PICKER_SUBTITLE};
use crate::models::{RgbColor, PLACEHOLDER_GLYPH};
use crate::picker::{CardView, IconView, PickerModal};
use crate::store::SelectionStore;

/// Card size in cells, borders included.
const CARD_WIDTH: u16 = 16;
const CARD_HEIGHT: u16 = 6;

/// Rows above the grid: title, subtitle, blank.
const HEADER_HEIGHT: u16 = 3;

const CLOSE_LABEL: &str = "[X]";

/// Where everything in the picker goes, at rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerLayout {
    /// Comic panel
    pub panel: Rect,
    /// Close button on the panel's top edge
    pub close: Rect,
    /// Title and subtitle
    pub header: Rect,
    /// Hint line
    pub footer: Rect,
    /// Cards per grid row
    pub columns: usize,
    /// One rect per card, in catalog order; cards that don't fit are empty
    pub cards: Vec<Rect>,
}

/// Cards per row for a panel interior `width` cells wide: 8, 4 or 2.
#[must_use]
pub fn grid_columns(width: u16) -> usize {
    [8, 4, 2]
        .into_iter()
        .find(|&columns| usize::from(width) >= columns * usize::from(CARD_WIDTH))
        .unwrap_or(1)
}

impl PickerLayout {
    /// Layout of `card_count` cards over `area`.
    #[must_use]
    pub fn compute(area: Rect, card_count: usize) -> Self {
        let panel = Rect {
            x: area.x + area.width / 20,
            y: area.y + area.height / 20,
            width: area.width - area.width / 10,
            height: area.height - area.height / 10,
        };
        let inner = Block::default().borders(Borders::ALL).inner(panel);
        let close_width = CLOSE_LABEL.len() as u16;
        let close = Rect {
            x: (panel.right()).saturating_sub(close_width + 1),
            y: panel.y,
            width: close_width.min(panel.width),
            height: 1.min(panel.height),
        };
        let header = Rect {
            height: HEADER_HEIGHT.min(inner.height),
            ..inner
        };
        let footer = Rect {
            y: inner.bottom().saturating_sub(1),
            height: 1.min(inner.height),
            ..inner
        };
        let grid_top = header.bottom();
        let grid_bottom = footer.y;

        let columns = grid_columns(inner.width);
        let grid_width = (columns as u16) * CARD_WIDTH;
        let grid_left = inner.x + inner.width.saturating_sub(grid_width) / 2;

        let cards = (0..card_count)
            .map(|index| {
                let col = (index % columns) as u16;
                let row = (index / columns) as u16;
                let rect = Rect {
                    x: grid_left + col * CARD_WIDTH,
                    y: grid_top + row * CARD_HEIGHT,
                    width: CARD_WIDTH.min(inner.width),
                    height: CARD_HEIGHT,
                };
                if rect.bottom() <= grid_bottom && rect.right() <= inner.right() {
                    rect
                } else {
                    Rect::default()
                }
            })
            .collect();

        Self {
            panel,
            close,
            header,
            footer,
            columns,
            cards,
        }
    }

    /// Card under a screen cell.
    #[must_use]
    pub fn card_at(&self, col: u16, row: u16) -> Option<usize> {
        self.cards
            .iter()
            .position(|rect| !rect.is_empty() && contains(*rect, col, row))
    }

    /// Whether a screen cell is on the close button.
    #[must_use]
    pub fn close_hit(&self, col: u16, row: u16) -> bool {
        contains(self.close, col, row)
    }
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Shrinks `rect` around its center by `scale` and shifts it down by `dy` rows.
fn transform(rect: Rect, scale: f32, dy: i32, bounds: Rect) -> Rect {
    let scale = scale.clamp(0.0, 1.0);
    let width = (f32::from(rect.width) * scale).round() as u16;
    let height = (f32::from(rect.height) * scale).round() as u16;
    let x = rect.x + (rect.width - width) / 2;
    let y = (i32::from(rect.y) + i32::from(rect.height - height) / 2 + dy).max(0) as u16;
    Rect {
        x,
        y,
        width,
        height,
    }
    .intersection(bounds)
}

fn rows(px: f32) -> i32 {
    (px / CELL_HEIGHT_PX).round() as i32
}

/// Draws the open picker over `area`.
pub fn render(
    f: &mut Frame,
    area: Rect,
    picker: &PickerModal,
    store: &SelectionStore,
    now: Duration,
    theme: &Theme,
) {
    let viewport = viewport_size(area.width, area.height);
    let layout = PickerLayout::compute(area, store.catalog().len());

    // Backdrop
    let backdrop = picker.sample(Element::Backdrop, now, viewport);
    let shade = blend(theme.background, theme.backdrop, backdrop.visible_opacity());
    f.render_widget(Clear, area);
    f.render_widget(Block::default().style(Style::default().bg(shade)), area);

    // Panel
    let panel_state = picker.sample(Element::Panel, now, viewport);
    if !panel_state.is_visible() {
        return;
    }
    let panel = transform(layout.panel, panel_state.scale, rows(panel_state.y), area);
    let fade = |color: Color| blend(shade, color, panel_state.visible_opacity());
    let accent = picker.accent_color(store).to_ratatui_color();

    f.render_widget(Clear, panel);
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(fade(theme.text)))
            .style(Style::default().bg(theme.surface)),
        panel,
    );

    // Contents appear once the panel has (nearly) settled
    if panel_state.scale < 0.95 || rows(panel_state.y) != 0 {
        return;
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            CLOSE_LABEL,
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        layout.close,
    );

    let (lead, highlighted) = picker_title();
    let header = vec![
        Line::from(vec![
            Span::styled(
                lead,
                Style::default()
                    .fg(fade(theme.text))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                highlighted,
                Style::default()
                    .fg(fade(accent))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            PICKER_SUBTITLE.to_uppercase(),
            Style::default().fg(fade(theme.text_secondary)),
        )),
    ];
    f.render_widget(
        Paragraph::new(header).alignment(Alignment::Center),
        layout.header,
    );

    let grid = Rect {
        y: layout.header.bottom(),
        height: layout.footer.y.saturating_sub(layout.header.bottom()),
        ..layout.header
    };
    for (card, rect) in picker.cards(store, now, viewport).iter().zip(&layout.cards) {
        if rect.is_empty() || !card.visual.is_visible() {
            continue;
        }
        let shifted = transform(*rect, 1.0, rows(card.visual.y), grid);
        if !shifted.is_empty() {
            render_card(f, shifted, card, shade, theme);
        }
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            PICKER_FOOTER,
            Style::default().fg(fade(theme.text_muted)),
        ))
        .alignment(Alignment::Center),
        layout.footer,
    );
}

fn render_card(f: &mut Frame, area: Rect, card: &CardView, shade: Color, theme: &Theme) {
    let VisualState { opacity, .. } = card.visual;
    let fade = |color: Color| blend(shade, color, opacity);
    let color = card.display_color().to_ratatui_color();

    let border_type = if card.focused {
        BorderType::Double
    } else {
        BorderType::Rounded
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(fade(color)))
        .style(Style::default().bg(theme.surface));

    let icon = match &card.icon {
        IconView::Asset(_) => card.name.chars().take(1).collect::<String>(),
        IconView::Placeholder => PLACEHOLDER_GLYPH.to_string(),
    };
    let badge_fg = card.badge_text_color().to_ratatui_color();
    let badge_bg = if card.active {
        card.color
    } else {
        RgbColor::WHITE
    };

    let mut lines = vec![
        Line::from(Span::styled(
            icon,
            Style::default().fg(fade(color)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {} ", card.name),
            Style::default()
                .fg(fade(badge_fg))
                .bg(fade(badge_bg.to_ratatui_color()))
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if card.selected {
        lines.push(Line::from(Span::styled(
            "EQUIPPED",
            Style::default().fg(fade(theme.accent)),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
