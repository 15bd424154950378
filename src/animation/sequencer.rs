//! One-shot entrance sequencer.
//!
//! The sequencer stays `Pending` until its trigger element is reported mounted,
//! polling on a fixed interval. Once mounted it plays its timeline exactly once.
//! Nothing can interrupt or restart a run.

use std::time::Duration;

use super::{Element, Timeline, ViewportSize, VisualState};
use crate::error::SiteError;

/// Answers whether an element is currently in the render tree.
pub trait MountProbe {
    /// True once `element` has been laid out at least once.
    fn is_mounted(&self, element: Element) -> bool;
}

impl<F> MountProbe for F
where
    F: Fn(Element) -> bool,
{
    fn is_mounted(&self, element: Element) -> bool {
        self(element)
    }
}

/// How long and how often to wait for the trigger element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between mount checks
    pub interval: Duration,
    /// Give up after this many failed checks; `None` waits forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_attempts: Some(100),
        }
    }
}

/// Lifecycle of a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Waiting for the trigger element. `attempts` counts failed checks.
    Pending {
        /// Failed mount checks so far
        attempts: u32,
    },
    /// Playing the timeline.
    Running {
        /// Clock reading when the trigger was found
        started_at: Duration,
    },
    /// Final values are static.
    Complete,
    /// The trigger never mounted within the retry cap.
    Abandoned {
        /// Failed mount checks before giving up
        attempts: u32,
    },
}

/// Outcome of a mount check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountCheck {
    /// The run has started (or already had).
    Mounted,
    /// Check again at this instant.
    RetryAt(Duration),
    /// No further checks will be made.
    Abandoned,
}

/// Plays a timeline once its trigger element mounts.
#[derive(Debug, Clone)]
pub struct EntranceSequencer {
    timeline: Timeline,
    trigger: Element,
    policy: RetryPolicy,
    state: SequencerState,
    armed: bool,
}

impl EntranceSequencer {
    /// Creates a sequencer waiting on `trigger`.
    #[must_use]
    pub fn new(timeline: Timeline, trigger: Element, policy: RetryPolicy) -> Self {
        Self {
            timeline,
            trigger,
            policy,
            state: SequencerState::Pending { attempts: 0 },
            armed: false,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// The compiled script being played.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Element whose mount starts the run.
    #[must_use]
    pub fn trigger(&self) -> Element {
        self.trigger
    }

    /// Starts waiting for the trigger. Only the first call per page view is
    /// accepted; later calls return false and change nothing.
    pub fn arm(&mut self, now: Duration) -> bool {
        if self.armed {
            tracing::debug!(trigger = %self.trigger, "entrance already armed, ignoring");
            return false;
        }
        self.armed = true;
        tracing::debug!(trigger = %self.trigger, at_ms = now.as_millis(), "entrance armed");
        true
    }

    /// Checks whether the trigger is mounted and moves the state machine.
    ///
    /// While pending, a failed check returns the instant of the next check.
    /// Checks after the run has started are idempotent.
    pub fn on_mount_check(&mut self, now: Duration, probe: &dyn MountProbe) -> MountCheck {
        let attempts = match self.state {
            SequencerState::Pending { attempts } => attempts,
            SequencerState::Running { .. } | SequencerState::Complete => {
                return MountCheck::Mounted;
            }
            SequencerState::Abandoned { .. } => return MountCheck::Abandoned,
        };

        if !self.armed {
            self.arm(now);
        }

        if probe.is_mounted(self.trigger) {
            tracing::info!(
                trigger = %self.trigger,
                failed_checks = attempts,
                duration_s = self.timeline.duration(),
                "entrance animation started"
            );
            self.state = SequencerState::Running { started_at: now };
            return MountCheck::Mounted;
        }

        let attempts = attempts.saturating_add(1);
        if self
            .policy
            .max_attempts
            .is_some_and(|max| attempts >= max)
        {
            let err = SiteError::TargetNotMounted(self.trigger.to_string());
            tracing::warn!(error = %err, attempts, "entrance animation abandoned");
            self.state = SequencerState::Abandoned { attempts };
            return MountCheck::Abandoned;
        }

        self.state = SequencerState::Pending { attempts };
        MountCheck::RetryAt(now + self.policy.interval)
    }

    /// Completes the run once the timeline has played out. Returns true on
    /// the transition to `Complete`.
    pub fn advance(&mut self, now: Duration) -> bool {
        let SequencerState::Running { started_at } = self.state else {
            return false;
        };

        if self.elapsed_secs(started_at, now) >= self.timeline.duration() {
            tracing::info!("entrance animation complete");
            self.state = SequencerState::Complete;
            return true;
        }
        false
    }

    /// Whether frames still need to be produced for this sequencer.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.state, SequencerState::Running { .. })
    }

    /// Visual state of `element` at `now`.
    ///
    /// Pending shows the script's initial state; an abandoned run leaves every
    /// element at rest and fully visible.
    #[must_use]
    pub fn sample(&self, element: Element, now: Duration, viewport: ViewportSize) -> VisualState {
        match self.state {
            SequencerState::Pending { .. } => self.timeline.initial_state(element, viewport),
            SequencerState::Running { started_at } => {
                self.timeline
                    .sample(element, self.elapsed_secs(started_at, now), viewport)
            }
            SequencerState::Complete => self.timeline.final_state(element, viewport),
            SequencerState::Abandoned { .. } => VisualState::default(),
        }
    }

    fn elapsed_secs(&self, started_at: Duration, now: Duration) -> f32 {
        now.saturating_sub(started_at).as_secs_f32()
    }
}
