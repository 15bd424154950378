//! Navigation bar: brand, numbered links and the equipped character.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Theme;
use crate::branding::APP_DISPLAY_NAME;
use crate::models::CharacterOption;
use crate::navigation::Location;

/// A numbered link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    /// Digit that follows the link
    pub key: u8,
    /// Label
    pub label: &'static str,
    /// Target, `path[#fragment]`
    pub href: &'static str,
}

impl NavLink {
    /// Parsed target.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::parse(self.href)
    }

    fn text(&self) -> String {
        format!("{} {}", self.key, self.label)
    }
}

/// Links in bar order; `key` is the 1-based position.
pub static NAV_LINKS: [NavLink; 9] = [
    NavLink { key: 1, label: "Home", href: "/" },
    NavLink { key: 2, label: "About", href: "/#about-section" },
    NavLink { key: 3, label: "Events", href: "/#events-section" },
    NavLink { key: 4, label: "Timeline", href: "/#timeline-section" },
    NavLink { key: 5, label: "Sponsors", href: "/#sponsors-section" },
    NavLink { key: 6, label: "Contact", href: "/#contact-section" },
    NavLink { key: 7, label: "Team", href: "/team" },
    NavLink { key: 8, label: "Gallery", href: "/gallery" },
    NavLink { key: 9, label: "All Events", href: "/events" },
];

/// Link bound to a digit key.
#[must_use]
pub fn link_for_key(key: u8) -> Option<&'static NavLink> {
    NAV_LINKS.iter().find(|link| link.key == key)
}

const LINK_GAP: u16 = 2;

fn links_start(inner: Rect) -> u16 {
    inner.x + APP_DISPLAY_NAME.chars().count() as u16 + 3
}

/// Screen columns covered by each link, as `(first column, width)`.
#[must_use]
pub fn link_columns(area: Rect) -> Vec<(u16, u16)> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let mut col = links_start(inner);
    NAV_LINKS
        .iter()
        .map(|link| {
            let width = link.text().chars().count() as u16;
            let span = (col, width);
            col += width + LINK_GAP;
            span
        })
        .collect()
}

/// Link under a screen cell of a bar drawn in `area`.
#[must_use]
pub fn link_at(area: Rect, col: u16, row: u16) -> Option<&'static NavLink> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if row != inner.y {
        return None;
    }
    link_columns(area)
        .into_iter()
        .zip(NAV_LINKS.iter())
        .find(|((start, width), _)| col >= *start && col < start + width && col < inner.right())
        .map(|(_, link)| link)
}

fn indicator_text(character: &CharacterOption) -> String {
    format!("● {}", character.name)
}

/// Whether a screen cell is on the equipped-character indicator.
#[must_use]
pub fn indicator_hit(area: Rect, col: u16, row: u16, character: &CharacterOption) -> bool {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let width = indicator_text(character).chars().count() as u16;
    row == inner.y && col < inner.right() && col >= inner.right().saturating_sub(width)
}

/// Whether `link` is the page being shown.
#[must_use]
pub fn is_current(link: &NavLink, location: &Location) -> bool {
    let target = link.location();
    target.path == location.path && target.fragment == location.fragment
}

/// Draws the bar.
pub fn render(
    f: &mut Frame,
    area: Rect,
    location: &Location,
    character: &CharacterOption,
    theme: &Theme,
) {
    let mut spans = vec![
        Span::styled(
            APP_DISPLAY_NAME,
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(theme.text_muted)),
    ];
    for (index, link) in NAV_LINKS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" ".repeat(usize::from(LINK_GAP))));
        }
        let style = if is_current(link, location) {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.text_secondary)
        };
        spans.push(Span::styled(link.text(), style));
    }

    let indicator = Line::from(Span::styled(
        indicator_text(character),
        Style::default()
            .fg(character.color.to_ratatui_color())
            .add_modifier(Modifier::BOLD),
    ))
    .right_aligned();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
    f.render_widget(Paragraph::new(indicator), inner);
}
