//! Integration tests for fragment scrolling across navigations

use std::time::Duration;

use synchronize::navigation::{
    Location, ScrollBehavior, ScrollCoordinator, ScrollPlan, ScrollTarget, ScrollViewport,
};
use synchronize::scheduler::TimerQueue;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A page with sections at fixed offsets.
struct Page {
    sections: Vec<(&'static str, u32)>,
    offset: u32,
    scrolls: Vec<(u32, ScrollBehavior)>,
}

impl Page {
    fn team() -> Self {
        Self {
            sections: vec![("team-section", 0), ("volunteers-section", 900)],
            offset: 0,
            scrolls: Vec::new(),
        }
    }

    fn home() -> Self {
        Self {
            sections: vec![
                ("hero-section", 0),
                ("about-section", 720),
                ("events-section", 1500),
                ("contact-section", 4000),
            ],
            offset: 2200,
            scrolls: Vec::new(),
        }
    }
}

impl ScrollViewport for Page {
    fn element_exists(&self, id: &str) -> bool {
        self.sections.iter().any(|(section, _)| *section == id)
    }

    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) {
        if let Some((_, top)) = self.sections.iter().find(|(section, _)| *section == id) {
            self.offset = *top;
            self.scrolls.push((*top, behavior));
        }
    }

    fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        self.offset = 0;
        self.scrolls.push((0, behavior));
    }
}

/// Navigates at `now`, scheduling any deferred scroll.
fn navigate(
    coordinator: &ScrollCoordinator,
    timers: &mut TimerQueue<ScrollTarget>,
    page: &mut Page,
    location: &str,
    now: Duration,
) {
    if let Some(plan) = coordinator.on_location_change(&Location::parse(location), now) {
        if let Some((due, target)) = coordinator.dispatch(plan, page) {
            timers.schedule_at(due, target);
        }
    }
}

fn run_until(
    coordinator: &ScrollCoordinator,
    timers: &mut TimerQueue<ScrollTarget>,
    page: &mut Page,
    until: Duration,
) {
    while let Some((_, target)) = timers.pop_due(until) {
        coordinator.apply(&target, page);
    }
}

#[test]
fn test_fragment_scrolls_after_settle_delay() {
    let coordinator = ScrollCoordinator::default();
    let mut timers = TimerQueue::new();
    let mut page = Page::team();

    navigate(&coordinator, &mut timers, &mut page, "/team#volunteers-section", ms(1_000));
    run_until(&coordinator, &mut timers, &mut page, ms(1_099));
    assert!(page.scrolls.is_empty());

    run_until(&coordinator, &mut timers, &mut page, ms(1_100));
    assert_eq!(page.scrolls, vec![(900, ScrollBehavior::Smooth)]);
    assert_eq!(page.offset, 900);
}

#[test]
fn test_root_fragment_scrolls_to_team_section() {
    let coordinator = ScrollCoordinator::default();
    let mut timers = TimerQueue::new();
    let mut page = Page {
        sections: vec![("hero-section", 0), ("team-section", 1200)],
        offset: 0,
        scrolls: Vec::new(),
    };

    navigate(&coordinator, &mut timers, &mut page, "/#team-section", ms(0));
    assert!(page.scrolls.is_empty());

    run_until(&coordinator, &mut timers, &mut page, ms(99));
    assert!(page.scrolls.is_empty());

    run_until(&coordinator, &mut timers, &mut page, ms(100));
    assert_eq!(page.scrolls, vec![(1200, ScrollBehavior::Smooth)]);
    assert_eq!(page.offset, 1200);
}

#[test]
fn test_missing_fragment_is_a_no_op() {
    let coordinator = ScrollCoordinator::default();
    let mut timers = TimerQueue::new();
    let mut page = Page::home();

    navigate(&coordinator, &mut timers, &mut page, "/#does-not-exist", ms(0));
    run_until(&coordinator, &mut timers, &mut page, ms(5_000));

    assert!(page.scrolls.is_empty());
    assert_eq!(page.offset, 2200);
    assert!(timers.is_empty());
}

#[test]
fn test_root_scrolls_to_top_immediately() {
    let coordinator = ScrollCoordinator::default();
    let mut timers = TimerQueue::new();
    let mut page = Page::home();

    navigate(&coordinator, &mut timers, &mut page, "/", ms(0));
    assert_eq!(page.scrolls, vec![(0, ScrollBehavior::Smooth)]);
    assert!(timers.is_empty());
}

#[test]
fn test_plain_route_keeps_position() {
    let coordinator = ScrollCoordinator::default();
    let mut page = Page::team();
    page.offset = 300;

    assert_eq!(
        coordinator.on_location_change(&Location::parse("/team"), ms(0)),
        None
    );
    assert_eq!(page.offset, 300);
}

#[test]
fn test_rapid_navigations_each_resolve() {
    let coordinator = ScrollCoordinator::new(ms(100));
    let mut timers = TimerQueue::new();
    let mut page = Page::home();

    navigate(&coordinator, &mut timers, &mut page, "/#about-section", ms(0));
    navigate(&coordinator, &mut timers, &mut page, "/#contact-section", ms(50));
    run_until(&coordinator, &mut timers, &mut page, ms(1_000));

    // Deferred scrolls are not cancelled; the last one wins
    assert_eq!(
        page.scrolls,
        vec![(720, ScrollBehavior::Smooth), (4000, ScrollBehavior::Smooth)]
    );
    assert_eq!(page.offset, 4000);
}

#[test]
fn test_settle_delay_is_configurable() {
    let coordinator = ScrollCoordinator::new(ms(250));
    assert_eq!(
        coordinator.on_location_change(&Location::parse("/#events-section"), ms(40)),
        Some(ScrollPlan::Deferred {
            due: ms(290),
            id: "events-section".to_string(),
        })
    );
}
