//! Scroll coordination on navigation.
//!
//! The coordinator holds no state between navigations. It turns each location
//! change into a plan, and applies plans to whatever viewport is rendering the
//! page. Deferred plans are the caller's to schedule.

use std::time::Duration;

use super::Location;
use crate::error::SiteError;

/// How a scroll is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Eased scroll
    #[default]
    Smooth,
    /// Jump
    Instant,
}

/// What to scroll to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    /// Align the element with this id to the top of the viewport.
    Element(String),
    /// Top of the page.
    Top,
}

/// Reaction to one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollPlan {
    /// Scroll now.
    Immediate(ScrollTarget),
    /// Scroll to an element once layout has settled.
    Deferred {
        /// Clock reading at which to resolve the element
        due: Duration,
        /// Element id
        id: String,
    },
}

/// Something that can be scrolled.
pub trait ScrollViewport {
    /// Whether an element with this id is on the page.
    fn element_exists(&self, id: &str) -> bool;

    /// Scrolls so the element's top edge meets the viewport's top edge.
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior);

    /// Scrolls to the top of the page.
    fn scroll_to_top(&mut self, behavior: ScrollBehavior);
}

/// Turns navigations into scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCoordinator {
    settle_delay: Duration,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl ScrollCoordinator {
    /// Coordinator that waits `settle_delay` before resolving fragment targets.
    #[must_use]
    pub const fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    /// Delay before fragment targets are resolved.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Plans the scroll for a navigation that happened at `now`.
    ///
    /// A fragment is resolved after the settle delay. Without one, only the
    /// root path scrolls (to the top); other paths keep their position.
    #[must_use]
    pub fn on_location_change(&self, location: &Location, now: Duration) -> Option<ScrollPlan> {
        match &location.fragment {
            Some(id) => Some(ScrollPlan::Deferred {
                due: now + self.settle_delay,
                id: id.clone(),
            }),
            None if location.is_root() => Some(ScrollPlan::Immediate(ScrollTarget::Top)),
            None => None,
        }
    }

    /// Performs a scroll. Returns false, without touching the viewport, when
    /// the target element does not exist.
    pub fn apply(&self, target: &ScrollTarget, viewport: &mut dyn ScrollViewport) -> bool {
        match target {
            ScrollTarget::Top => {
                viewport.scroll_to_top(ScrollBehavior::Smooth);
                true
            }
            ScrollTarget::Element(id) if viewport.element_exists(id) => {
                tracing::debug!(target = %id, "scrolling to fragment");
                viewport.scroll_into_view(id, ScrollBehavior::Smooth);
                true
            }
            ScrollTarget::Element(id) => {
                let err = SiteError::ScrollTargetMissing(id.clone());
                tracing::debug!(error = %err, "ignoring fragment navigation");
                false
            }
        }
    }

    /// Applies an immediate plan right away. Deferred plans are returned as
    /// `(due, target)` for the caller to schedule.
    pub fn dispatch(
        &self,
        plan: ScrollPlan,
        viewport: &mut dyn ScrollViewport,
    ) -> Option<(Duration, ScrollTarget)> {
        match plan {
            ScrollPlan::Immediate(target) => {
                self.apply(&target, viewport);
                None
            }
            ScrollPlan::Deferred { due, id } => Some((due, ScrollTarget::Element(id))),
        }
    }
}
