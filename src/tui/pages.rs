//! Page content and the scrollable page viewport.
//!
//! Every route is laid out as a column of blocks: the hero (home only) and
//! then titled text sections. Each block carries the element id fragment
//! navigation resolves against.

use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Theme;
use crate::animation::Easing;
use crate::navigation::{Route, ScrollBehavior, ScrollViewport};

/// Element id of the home hero.
pub const HERO_SECTION_ID: &str = "hero-section";

/// Rows of the hero when the page area is too short to give it a full screen.
const MIN_HERO_HEIGHT: u16 = 16;

/// A titled block of static copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSection {
    /// Element id, the target of `#fragment` links
    pub id: &'static str,
    /// Heading
    pub title: &'static str,
    /// Paragraphs; each one is word-wrapped to the page width
    pub paragraphs: &'static [&'static str],
}

const HOME_SECTIONS: [PageSection; 5] = [
    PageSection {
        id: "about-section",
        title: "ABOUT THE INITIATIVE",
        paragraphs: &[
            "Synchronize is the annual tech fest where builders, designers and tinkerers assemble for two days of competitions, talks and late-night hacking.",
            "This year's edition honours the first avenger: every event is a mission and every participant an agent.",
        ],
    },
    PageSection {
        id: "events-section",
        title: "EVENTS",
        paragraphs: &[
            "Code Assemble: a 24-hour hackathon for teams of up to four.",
            "Shield Breaker: capture-the-flag for security enthusiasts.",
            "Stark Expo: project showcase with live demos and judging.",
            "Quantum Quiz: rapid-fire trivia across science and pop culture.",
        ],
    },
    PageSection {
        id: "timeline-section",
        title: "TIMELINE",
        paragraphs: &[
            "Day 1, 09:00: opening ceremony and team check-in.",
            "Day 1, 11:00: hackathon kickoff, capture-the-flag opens.",
            "Day 2, 10:00: Stark Expo showcase.",
            "Day 2, 17:00: final judging and closing ceremony.",
        ],
    },
    PageSection {
        id: "sponsors-section",
        title: "SPONSORS",
        paragraphs: &[
            "Synchronize is made possible by partners who believe in student builders. Reach out through the contact section to join the roster.",
        ],
    },
    PageSection {
        id: "contact-section",
        title: "CONTACT",
        paragraphs: &[
            "Questions about registration, sponsorship or volunteering? Drop by the help desk or write to the organising committee.",
        ],
    },
];

const TEAM_SECTIONS: [PageSection; 2] = [
    PageSection {
        id: "team-section",
        title: "THE TEAM",
        paragraphs: &[
            "Faculty coordinators, student leads and the crew of volunteers who keep the fest running.",
        ],
    },
    PageSection {
        id: "volunteers-section",
        title: "VOLUNTEERS",
        paragraphs: &[
            "Logistics, design, outreach and tech support. Look for the shield badge on event days.",
        ],
    },
];

const GALLERY_SECTIONS: [PageSection; 1] = [PageSection {
    id: "gallery-section",
    title: "GALLERY",
    paragraphs: &[
        "Highlights from previous editions: the hackathon floor at 3am, the expo stage and the closing night.",
    ],
}];

const EVENTS_SECTIONS: [PageSection; 1] = [PageSection {
    id: "schedule-section",
    title: "ALL EVENTS",
    paragraphs: &[
        "Full schedule with venues, team sizes and prizes for every competition.",
        "Registration closes the evening before each event.",
    ],
}];

const NOT_FOUND_SECTIONS: [PageSection; 1] = [PageSection {
    id: "not-found",
    title: "PAGE NOT FOUND",
    paragraphs: &["This page does not exist. Press 1 to return home."],
}];

/// Sections rendered for a route, in page order.
#[must_use]
pub fn sections(route: Route) -> &'static [PageSection] {
    match route {
        Route::Home => &HOME_SECTIONS,
        Route::Team => &TEAM_SECTIONS,
        Route::Gallery => &GALLERY_SECTIONS,
        Route::Events => &EVENTS_SECTIONS,
        Route::NotFound => &NOT_FOUND_SECTIONS,
    }
}

/// Word-wraps `text` to `width` columns. Words longer than a row are split.
#[must_use]
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut row = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = row.chars().count();
            let gap = usize::from(used > 0);
            if used + gap + word.len() <= width {
                if gap == 1 {
                    row.push(' ');
                }
                row.extend(word.iter());
                break;
            }
            if used > 0 {
                rows.push(std::mem::take(&mut row));
                continue;
            }
            let rest = word.split_off(width);
            rows.push(word.into_iter().collect());
            word = rest;
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }
    rows
}

/// What a placed block draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// The animated hero
    Hero,
    /// A text section
    Section(&'static PageSection),
}

/// A block positioned on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedBlock {
    /// Element id
    pub id: &'static str,
    /// First page row
    pub top: u16,
    /// Rows occupied
    pub height: u16,
    /// Content
    pub kind: BlockKind,
}

impl PlacedBlock {
    /// Part of this block visible through a window of `height` rows starting at
    /// page row `offset`, as `(screen row, first block row, rows)`.
    #[must_use]
    pub fn visible_span(&self, offset: u16, height: u16) -> Option<(u16, u16, u16)> {
        let start = self.top.max(offset);
        let end = (self.top + self.height).min(offset.saturating_add(height));
        (start < end).then(|| (start - offset, start - self.top, end - start))
    }
}

fn section_height(section: &PageSection, width: u16) -> u16 {
    let body: usize = section
        .paragraphs
        .iter()
        .map(|paragraph| wrap(paragraph, width).len())
        .sum();
    // title, underline, body, blank spacer
    u16::try_from(body).unwrap_or(u16::MAX).saturating_add(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    started_at: Duration,
}

/// Scroll state of the page area.
///
/// Programmatic scrolls (fragment navigation, scroll-to-top) animate over the
/// smooth scroll duration. User scrolling jumps, and is ignored while locked.
#[derive(Debug, Clone)]
pub struct PageViewport {
    route: Route,
    width: u16,
    height: u16,
    blocks: Vec<PlacedBlock>,
    content_height: u16,
    offset: f32,
    animation: Option<ScrollAnimation>,
    smooth_duration: Duration,
    now: Duration,
    locked: bool,
}

impl PageViewport {
    /// Creates an empty viewport; call [`Self::layout`] before use.
    #[must_use]
    pub fn new(smooth_duration: Duration) -> Self {
        Self {
            route: Route::Home,
            width: 0,
            height: 0,
            blocks: Vec::new(),
            content_height: 0,
            offset: 0.0,
            animation: None,
            smooth_duration,
            now: Duration::ZERO,
            locked: false,
        }
    }

    /// Lays out `route` for a page area of `width` x `height` cells. The
    /// current offset is kept, clamped to the new content.
    pub fn layout(&mut self, route: Route, width: u16, height: u16) {
        if !self.blocks.is_empty()
            && self.route == route
            && self.width == width
            && self.height == height
        {
            return;
        }

        self.route = route;
        self.width = width;
        self.height = height;
        self.blocks.clear();

        let mut top = 0u16;
        if route == Route::Home {
            let hero_height = height.max(MIN_HERO_HEIGHT);
            self.blocks.push(PlacedBlock {
                id: HERO_SECTION_ID,
                top,
                height: hero_height,
                kind: BlockKind::Hero,
            });
            top = hero_height;
        }

        for section in sections(route) {
            let height = section_height(section, width);
            self.blocks.push(PlacedBlock {
                id: section.id,
                top,
                height,
                kind: BlockKind::Section(section),
            });
            top = top.saturating_add(height);
        }

        self.content_height = top;
        let max_offset = f32::from(self.max_offset());
        self.offset = self.offset.min(max_offset);
        if let Some(animation) = self.animation.as_mut() {
            animation.to = animation.to.min(max_offset);
        }
    }

    /// Route currently laid out.
    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    /// Blocks in page order.
    #[must_use]
    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    /// First visible page row.
    #[must_use]
    pub fn offset(&self) -> u16 {
        self.offset.round() as u16
    }

    /// Largest offset that still fills the viewport.
    #[must_use]
    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.height)
    }

    /// Total rows of content.
    #[must_use]
    pub fn content_height(&self) -> u16 {
        self.content_height
    }

    /// Visible rows.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Page row of the block with this id.
    #[must_use]
    pub fn block_top(&self, id: &str) -> Option<u16> {
        self.blocks
            .iter()
            .find(|block| block.id == id)
            .map(|block| block.top)
    }

    /// Advances a running smooth scroll to `now`.
    pub fn tick(&mut self, now: Duration) {
        self.now = now;
        let Some(animation) = self.animation else {
            return;
        };

        let elapsed = now.saturating_sub(animation.started_at);
        if self.smooth_duration.is_zero() || elapsed >= self.smooth_duration {
            self.offset = animation.to;
            self.animation = None;
            return;
        }

        let progress = elapsed.as_secs_f32() / self.smooth_duration.as_secs_f32();
        let eased = Easing::POWER2_IN_OUT.apply(progress);
        self.offset = animation.from + (animation.to - animation.from) * eased;
    }

    /// Whether a smooth scroll is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Locks or unlocks user scrolling.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Whether user scrolling is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// User scroll by `rows`. Returns false when locked.
    pub fn scroll_by(&mut self, rows: i32) -> bool {
        if self.locked {
            return false;
        }
        self.animation = None;
        let target = (self.offset + rows as f32).clamp(0.0, f32::from(self.max_offset()));
        self.offset = target.round();
        true
    }

    /// User jump to the last screen. Returns false when locked.
    pub fn scroll_to_bottom(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.animation = None;
        self.offset = f32::from(self.max_offset());
        true
    }

    /// User jump to the top. Returns false when locked.
    pub fn jump_to_top(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.animation = None;
        self.offset = 0.0;
        true
    }

    fn scroll_to_row(&mut self, row: u16, behavior: ScrollBehavior) {
        let target = f32::from(row.min(self.max_offset()));
        match behavior {
            ScrollBehavior::Smooth if (target - self.offset).abs() < 0.5 => {
                self.animation = None;
                self.offset = target;
            }
            ScrollBehavior::Smooth => {
                self.animation = Some(ScrollAnimation {
                    from: self.offset,
                    to: target,
                    started_at: self.now,
                });
            }
            ScrollBehavior::Instant => {
                self.animation = None;
                self.offset = target;
            }
        }
    }
}

impl ScrollViewport for PageViewport {
    fn element_exists(&self, id: &str) -> bool {
        self.block_top(id).is_some()
    }

    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) {
        if let Some(top) = self.block_top(id) {
            self.scroll_to_row(top, behavior);
        }
    }

    fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        self.scroll_to_row(0, behavior);
    }
}

/// Draws the visible part of a text section.
pub fn render_section(
    f: &mut Frame,
    area: Rect,
    section: &PageSection,
    first_row: u16,
    theme: &Theme,
) {
    let rule = "═".repeat(section.title.chars().count());
    let mut lines = vec![
        Line::from(Span::styled(
            section.title,
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(rule, Style::default().fg(theme.accent))),
    ];
    for paragraph in section.paragraphs {
        lines.extend(
            wrap(paragraph, area.width)
                .into_iter()
                .map(|row| Line::from(Span::styled(row, Style::default().fg(theme.text)))),
        );
    }

    let paragraph = Paragraph::new(lines).scroll((first_row, 0));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn home(height: u16) -> PageViewport {
        let mut page = PageViewport::new(ms(400));
        page.layout(Route::Home, 60, height);
        page
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn test_home_layout_starts_with_hero() {
        let page = home(20);
        let blocks = page.blocks();
        assert_eq!(blocks[0].id, HERO_SECTION_ID);
        assert_eq!(blocks[0].height, 20);
        assert_eq!(blocks[1].id, "about-section");
        assert_eq!(blocks[1].top, 20);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].top + pair[0].height, pair[1].top);
        }
    }

    #[test]
    fn test_team_page_has_no_hero() {
        let mut page = PageViewport::new(ms(400));
        page.layout(Route::Team, 60, 20);
        assert!(page.element_exists("team-section"));
        assert!(!page.element_exists(HERO_SECTION_ID));
    }

    #[test]
    fn test_smooth_scroll_eases_to_target() {
        let mut page = home(20);
        page.tick(ms(1_000));
        page.scroll_into_view("events-section", ScrollBehavior::Smooth);
        let target = page.block_top("events-section").unwrap().min(page.max_offset());

        page.tick(ms(1_200));
        assert!(page.is_animating());
        let midway = page.offset();
        assert!(midway > 0 && midway < target, "{midway} of {target}");

        page.tick(ms(1_400));
        assert!(!page.is_animating());
        assert_eq!(page.offset(), target);
    }

    #[test]
    fn test_lock_blocks_user_scroll_only() {
        let mut page = home(10);
        page.set_locked(true);
        assert!(!page.scroll_by(5));
        assert_eq!(page.offset(), 0);

        let about = page.block_top("about-section").unwrap();
        page.scroll_into_view("about-section", ScrollBehavior::Instant);
        assert_eq!(page.offset(), about);

        page.set_locked(false);
        assert!(page.scroll_by(-3));
        assert_eq!(page.offset(), about - 3);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut page = home(10);
        page.scroll_by(10_000);
        assert_eq!(page.offset(), page.max_offset());
        page.scroll_by(-10_000);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_visible_span() {
        let block = PlacedBlock {
            id: "about-section",
            top: 10,
            height: 5,
            kind: BlockKind::Hero,
        };
        assert_eq!(block.visible_span(0, 10), None);
        assert_eq!(block.visible_span(0, 12), Some((10, 0, 2)));
        assert_eq!(block.visible_span(12, 10), Some((0, 2, 3)));
    }
}
