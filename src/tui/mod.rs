//! Terminal user interface for the event site.
//!
//! The loop is single-threaded. Each iteration reads the clock, drains store
//! notifications, fires due timers, draws a frame and then waits for input
//! until the next frame or timer is due.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]

pub mod hero;
pub mod nav_bar;
pub mod pages;
pub mod picker_overlay;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::animation::{presets, Element, EntranceSequencer, MountCheck};
use crate::config::Config;
use crate::models::CharacterOption;
use crate::navigation::{Location, Route, ScrollCoordinator, ScrollTarget};
use crate::picker::PickerModal;
use crate::scheduler::TimerQueue;
use crate::shortcuts::{Action, ShortcutRegistry, PAGE_CONTEXT, PICKER_CONTEXT};
use crate::store::{SelectionStore, StoreEvent, SubscriptionId};

use hero::{HeroLayout, HeroView};
use pages::{BlockKind, PageViewport};
use picker_overlay::PickerLayout;

pub use theme::Theme;

/// Longest wait for input when nothing is animating.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: i32 = 3;

/// Work scheduled on the app clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    /// Check whether the hero shield has mounted.
    MountCheck,
    /// Resolve a fragment scroll once layout has settled.
    Scroll(ScrollTarget),
}

/// Screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    /// Whole terminal
    pub area: Rect,
    /// Navigation bar
    pub nav: Rect,
    /// Scrollable page
    pub page: Rect,
    /// Status and hints
    pub status: Rect,
}

impl ScreenLayout {
    /// Splits the terminal area.
    #[must_use]
    pub fn compute(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Nav bar
                Constraint::Min(1),    // Page
                Constraint::Length(1), // Status line
            ])
            .split(area);

        Self {
            area,
            nav: chunks[0],
            page: chunks[1],
            status: chunks[2],
        }
    }
}

/// Application state
pub struct AppState {
    // Core
    /// Selection store, the only writer of the equipped character
    pub store: SelectionStore,
    /// Picker modal, mirrors the store's visibility flag
    pub picker: PickerModal,
    /// Hero entrance
    pub sequencer: EntranceSequencer,
    /// Fragment scrolling
    pub coordinator: ScrollCoordinator,
    /// Page scroll state
    pub page: PageViewport,
    /// Current location
    pub location: Location,
    /// Pending timers
    pub timers: TimerQueue<Timer>,

    // UI
    /// Configuration
    pub config: Config,
    /// Colors
    pub theme: Theme,
    /// Key bindings
    pub shortcuts: ShortcutRegistry,
    /// Last mouse position
    pub pointer: Option<(u16, u16)>,
    /// Message shown in the status line
    pub status_message: String,
    /// Set to leave the loop
    pub should_quit: bool,

    screen: ScreenLayout,
    inbox: Rc<RefCell<VecDeque<StoreEvent>>>,
    subscription: SubscriptionId,
    hero_drawn: bool,
}

fn hero_sequencer(config: &Config) -> EntranceSequencer {
    EntranceSequencer::new(
        presets::hero_entrance(),
        Element::Shield,
        config.animation.retry_policy(),
    )
}

impl AppState {
    /// Creates the app at `location`, at clock reading zero.
    pub fn new(mut store: SelectionStore, config: Config, location: Location) -> Self {
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&inbox);
        let subscription = store.subscribe(move |event: &StoreEvent| {
            sink.borrow_mut().push_back(event.clone());
        });

        let mut picker = PickerModal::new(config.animation.card_stagger());
        if let Some(dir) = &config.selection.assets_dir {
            picker = picker.with_assets_dir(dir);
        }

        let mut state = Self {
            store,
            picker,
            sequencer: hero_sequencer(&config),
            coordinator: ScrollCoordinator::new(config.animation.scroll_settle()),
            page: PageViewport::new(config.animation.smooth_scroll()),
            location: Location::root(),
            timers: TimerQueue::new(),
            theme: Theme::from_mode(config.ui.theme_mode),
            config,
            shortcuts: ShortcutRegistry::new(),
            pointer: None,
            status_message: String::new(),
            should_quit: false,
            screen: ScreenLayout::default(),
            inbox,
            subscription,
            hero_drawn: false,
        };
        state.enter(location, Duration::ZERO, true);
        state
    }

    /// Current screen regions.
    #[must_use]
    pub fn screen(&self) -> ScreenLayout {
        self.screen
    }

    /// Lays the screen out for a terminal of `area`.
    pub fn resize(&mut self, area: Rect) {
        self.screen = ScreenLayout::compute(area);
        self.page.layout(
            self.location.route(),
            self.screen.page.width,
            self.screen.page.height,
        );
    }

    /// Records whether the last frame drew the hero with room for the shield.
    pub fn set_hero_drawn(&mut self, drawn: bool) {
        self.hero_drawn = drawn;
    }

    /// Navigates to `location`.
    pub fn navigate(&mut self, location: Location, now: Duration) {
        self.enter(location, now, false);
    }

    fn enter(&mut self, location: Location, now: Duration, initial: bool) {
        let was_home = !initial && self.location.route() == Route::Home;
        let route = location.route();

        if was_home && route != Route::Home {
            self.timers.cancel_where(|timer| *timer == Timer::MountCheck);
            self.hero_drawn = false;
        }
        if route == Route::Home && !was_home {
            // A fresh hero mounts and plays its entrance again
            self.sequencer = hero_sequencer(&self.config);
            self.sequencer.arm(now);
            self.timers.schedule_at(now, Timer::MountCheck);
        }

        tracing::info!(from = %self.location, to = %location, "navigated");
        self.location = location;
        self.page
            .layout(route, self.screen.page.width, self.screen.page.height);
        self.page.tick(now);

        if let Some(plan) = self.coordinator.on_location_change(&self.location, now) {
            if let Some((due, target)) = self.coordinator.dispatch(plan, &mut self.page) {
                self.timers.schedule_at(due, Timer::Scroll(target));
            }
        }
    }

    /// Drains store notifications, fires due timers and advances animations.
    pub fn tick(&mut self, now: Duration) {
        self.page.tick(now);
        self.drain_store_events(now);

        while let Some((_, timer)) = self.timers.pop_due(now) {
            match timer {
                Timer::MountCheck => {
                    let drawn = self.hero_drawn;
                    let probe = move |element: Element| drawn && element == Element::Shield;
                    if let MountCheck::RetryAt(at) = self.sequencer.on_mount_check(now, &probe) {
                        self.timers.schedule_at(at, Timer::MountCheck);
                    }
                }
                Timer::Scroll(target) => {
                    self.coordinator.apply(&target, &mut self.page);
                }
            }
        }

        self.sequencer.advance(now);
    }

    fn drain_store_events(&mut self, now: Duration) {
        let events: Vec<StoreEvent> = self.inbox.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                StoreEvent::ModalVisibilityChanged(visible) => {
                    self.picker.sync_visibility(&self.store, now);
                    self.page.set_locked(visible);
                }
                StoreEvent::SelectionChanged { current, .. } => {
                    if let Some(option) = self.store.catalog().get(&current) {
                        self.status_message = format!("Equipped {}", option.name);
                    }
                }
            }
        }
    }

    /// How long to wait for input before the next iteration.
    #[must_use]
    pub fn poll_timeout(&self, now: Duration) -> Duration {
        if self.is_animating(now) {
            return self.config.ui.frame_interval();
        }
        self.timers
            .next_due()
            .map_or(IDLE_POLL, |due| due.saturating_sub(now).min(IDLE_POLL))
    }

    /// Whether anything on screen is moving.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        (self.location.route() == Route::Home && self.sequencer.is_animating())
            || self.picker.is_animating(now)
            || self.page.is_animating()
    }

    fn picker_layout(&self) -> PickerLayout {
        PickerLayout::compute(self.screen.area, self.store.catalog().len())
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Duration) {
        let context = if self.picker.is_open() {
            PICKER_CONTEXT
        } else {
            PAGE_CONTEXT
        };
        if let Some(action) = self.shortcuts.lookup(context, key) {
            self.dispatch(action, now);
        }
    }

    /// Performs an action.
    pub fn dispatch(&mut self, action: Action, now: Duration) {
        tracing::debug!(action = action.id(), "dispatching action");
        let page_rows = i32::from(self.page.height().saturating_sub(1).max(1));
        let columns = self.picker_layout().columns as isize;

        match action {
            Action::ScrollUp => {
                self.page.scroll_by(-1);
            }
            Action::ScrollDown => {
                self.page.scroll_by(1);
            }
            Action::PageUp => {
                self.page.scroll_by(-page_rows);
            }
            Action::PageDown => {
                self.page.scroll_by(page_rows);
            }
            Action::ScrollTop => {
                self.page.jump_to_top();
            }
            Action::ScrollBottom => {
                self.page.scroll_to_bottom();
            }
            Action::FollowLink(key) => {
                if let Some(link) = nav_bar::link_for_key(key) {
                    self.navigate(link.location(), now);
                }
            }
            Action::OpenPicker => {
                self.store.set_modal_visible(true);
            }
            Action::FocusLeft => self.picker.focus_previous(self.store.catalog()),
            Action::FocusRight => self.picker.focus_next(self.store.catalog()),
            Action::FocusUp => self.picker.focus_by(self.store.catalog(), -columns),
            Action::FocusDown => self.picker.focus_by(self.store.catalog(), columns),
            Action::Equip => {
                if let Err(err) = self.picker.commit_focused(&mut self.store) {
                    tracing::debug!(error = %err, "equip ignored");
                }
            }
            Action::ClosePicker => self.picker.close(&mut self.store),
            Action::Quit => self.should_quit = true,
        }

        self.drain_store_events(now);
    }

    /// Handles a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Duration) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer = Some((col, row));
                if self.picker.is_open() {
                    self.hover_at(col, row);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer = Some((col, row));
                self.click_at(col, row, now);
            }
            MouseEventKind::ScrollDown => {
                self.page.scroll_by(WHEEL_ROWS);
            }
            MouseEventKind::ScrollUp => {
                self.page.scroll_by(-WHEEL_ROWS);
            }
            _ => {}
        }
    }

    fn card_id_at(&self, col: u16, row: u16) -> Option<String> {
        self.picker_layout()
            .card_at(col, row)
            .and_then(|index| self.store.catalog().options().get(index))
            .map(|option| option.id.clone())
    }

    fn hover_at(&mut self, col: u16, row: u16) {
        let under = self.card_id_at(col, row);
        let previous = self.picker.hovered().map(str::to_string);
        if under == previous {
            return;
        }
        if let Some(previous) = previous {
            self.picker.pointer_leave(&previous);
        }
        if let Some(under) = under {
            self.picker.pointer_enter(&under);
        }
    }

    fn click_at(&mut self, col: u16, row: u16, now: Duration) {
        if self.picker.is_open() {
            if self.picker_layout().close_hit(col, row) {
                self.picker.close(&mut self.store);
            } else if let Some(id) = self.card_id_at(col, row) {
                if let Err(err) = self.picker.click(&mut self.store, &id) {
                    tracing::debug!(error = %err, "card click ignored");
                }
            }
        } else if let Some(link) = nav_bar::link_at(self.screen.nav, col, row) {
            self.navigate(link.location(), now);
        } else if nav_bar::indicator_hit(self.screen.nav, col, row, self.store.current_option()) {
            self.store.set_modal_visible(true);
        } else if self.gallery_button_hit(col, row, now) {
            self.navigate(Location::parse("/gallery"), now);
        }

        self.drain_store_events(now);
    }

    fn gallery_button_hit(&self, col: u16, row: u16, now: Duration) -> bool {
        let page = self.screen.page;
        if row < page.y || row >= page.bottom() || col < page.x {
            return false;
        }
        let Some(hero) = self
            .page
            .blocks()
            .iter()
            .find(|block| block.kind == BlockKind::Hero)
        else {
            return false;
        };

        let viewport = hero::viewport_size(page.width, hero.height);
        if !self
            .sequencer
            .sample(Element::Buttons, now, viewport)
            .is_visible()
        {
            return false;
        }

        let page_row = i32::from(self.page.offset()) + i32::from(row - page.y);
        HeroLayout::compute(page.width, hero.height)
            .gallery_hit(i32::from(col - page.x), page_row - i32::from(hero.top))
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

/// Setup terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui<B: Backend>(state: &mut AppState, terminal: &mut Terminal<B>) -> Result<()> {
    let started = Instant::now();

    loop {
        let now = started.elapsed();
        let size = terminal.size().context("Failed to read terminal size")?;
        state.resize(Rect::new(0, 0, size.width, size.height));
        state.tick(now);

        let mut hero_drawn = false;
        terminal.draw(|f| hero_drawn = render(f, state, now))?;
        state.set_hero_drawn(hero_drawn);

        if event::poll(state.poll_timeout(started.elapsed()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    state.handle_key(key, started.elapsed());
                }
                Event::Mouse(mouse) => state.handle_mouse(mouse, started.elapsed()),
                // Resize is picked up at the top of the loop
                _ => {}
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state. Returns whether the hero was drawn with
/// room for the shield.
pub fn render(f: &mut Frame, state: &AppState, now: Duration) -> bool {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let screen = ScreenLayout::compute(f.area());
    let character = state.store.current_option();

    nav_bar::render(f, screen.nav, &state.location, character, &state.theme);
    let hero_drawn = render_page(f, screen.page, state, now);
    render_status(f, screen.status, state);

    if state.picker.is_open() {
        picker_overlay::render(f, screen.area, &state.picker, &state.store, now, &state.theme);
    }
    if state.config.ui.show_pointer {
        if let Some(pointer) = state.pointer {
            render_pointer(f, pointer, character);
        }
    }

    hero_drawn
}

fn render_page(f: &mut Frame, area: Rect, state: &AppState, now: Duration) -> bool {
    let offset = state.page.offset();
    let mut hero_drawn = false;

    for block in state.page.blocks() {
        let Some((screen_row, first_row, rows)) = block.visible_span(offset, area.height) else {
            continue;
        };
        let rect = Rect {
            x: area.x,
            y: area.y + screen_row,
            width: area.width,
            height: rows,
        };

        match block.kind {
            BlockKind::Hero => {
                let view = HeroView {
                    sequencer: &state.sequencer,
                    shield_color: state.store.current_option().color,
                    now,
                    theme: &state.theme,
                };
                hero_drawn = view.render(f.buffer_mut(), rect, first_row, block.height);
            }
            BlockKind::Section(section) => {
                pages::render_section(f, rect, section, first_row, &state.theme);
            }
        }
    }

    hero_drawn
}

fn render_status(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let hints = if state.picker.is_open() {
        "←→↑↓ focus · Enter equip · Esc close"
    } else {
        "c choose character · 1-9 navigate · j/k scroll · q quit"
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", state.location),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    )];
    if !state.status_message.is_empty() {
        spans.push(Span::styled(
            format!("{} · ", state.status_message),
            Style::default().fg(theme.accent),
        ));
    }
    spans.push(Span::styled(hints, Style::default().fg(theme.text_muted)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The decorative pointer: the equipped character's monogram at the mouse.
fn render_pointer(f: &mut Frame, (col, row): (u16, u16), character: &CharacterOption) {
    let area = f.area();
    if col >= area.right() || row >= area.bottom() {
        return;
    }

    let fg = if character.color.is_dark() {
        Color::White
    } else {
        Color::Black
    };
    if let Some(cell) = f.buffer_mut().cell_mut((col, row)) {
        cell.set_char(character.monogram()).set_style(
            Style::default()
                .fg(fg)
                .bg(character.color.to_ratatui_color())
                .add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SequencerState;
    use crate::config::ThemeMode;
    use crate::models::Catalog;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn app(location: &str) -> AppState {
        let mut config = Config::default();
        config.ui.theme_mode = ThemeMode::Dark;
        let store = SelectionStore::new(Catalog::builtin());
        let mut state = AppState::new(store, config, Location::parse(location));
        state.resize(Rect::new(0, 0, 100, 30));
        state
    }

    fn draw(state: &mut AppState, now: Duration) {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut hero_drawn = false;
        terminal
            .draw(|f| hero_drawn = render(f, state, now))
            .unwrap();
        state.set_hero_drawn(hero_drawn);
    }

    #[test]
    fn test_hero_starts_after_first_frame() {
        let mut state = app("/");
        state.tick(ms(0));
        assert_eq!(state.sequencer.state(), SequencerState::Pending { attempts: 1 });

        draw(&mut state, ms(16));
        state.tick(ms(100));
        assert_eq!(
            state.sequencer.state(),
            SequencerState::Running { started_at: ms(100) }
        );

        state.tick(ms(5_000));
        assert_eq!(state.sequencer.state(), SequencerState::Complete);
    }

    #[test]
    fn test_open_picker_locks_page() {
        let mut state = app("/");
        state.dispatch(Action::OpenPicker, ms(10));
        assert!(state.picker.is_open());
        assert!(state.page.is_locked());
        assert!(!state.page.scroll_by(1));

        state.dispatch(Action::ClosePicker, ms(20));
        assert!(!state.picker.is_open());
        assert!(!state.page.is_locked());
    }

    #[test]
    fn test_keyboard_equip() {
        let mut state = app("/");
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        state.handle_key(key(KeyCode::Char('c')), ms(0));
        state.handle_key(key(KeyCode::Right), ms(0));
        assert_eq!(state.picker.hovered(), Some("ironman"));
        state.handle_key(key(KeyCode::Enter), ms(0));
        assert_eq!(state.store.current(), "ironman");
        assert_eq!(state.status_message, "Equipped Iron Man");
        assert!(state.picker.is_open());
    }

    #[test]
    fn test_follow_section_link_scrolls_after_settle() {
        let mut state = app("/team");
        state.dispatch(Action::FollowLink(3), ms(1_000));
        assert_eq!(state.location.to_string(), "/#events-section");
        assert_eq!(state.page.offset(), 0);

        state.tick(ms(1_099));
        assert!(!state.page.is_animating());
        state.tick(ms(1_100));
        assert!(state.page.is_animating());

        state.tick(ms(2_000));
        let target = state
            .page
            .block_top("events-section")
            .unwrap()
            .min(state.page.max_offset());
        assert_eq!(state.page.offset(), target);
    }

    #[test]
    fn test_leaving_home_cancels_mount_checks() {
        let mut state = app("/");
        assert_eq!(state.timers.len(), 1);
        state.navigate(Location::parse("/gallery"), ms(10));
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_click_nav_link() {
        let mut state = app("/");
        let nav = state.screen().nav;
        let (col, _) = nav_bar::link_columns(nav)[6];
        state.handle_mouse(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: col,
                row: nav.y + 1,
                modifiers: KeyModifiers::NONE,
            },
            ms(0),
        );
        assert_eq!(state.location.route(), Route::Team);
    }

    #[test]
    fn test_poll_timeout_waits_for_next_timer() {
        let mut state = app("/gallery");
        assert_eq!(state.poll_timeout(ms(0)), IDLE_POLL);
        state.timers.schedule_at(ms(40), Timer::MountCheck);
        assert_eq!(state.poll_timeout(ms(10)), ms(30));
    }
}
