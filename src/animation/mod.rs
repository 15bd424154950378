//! Animation engine: easing curves, declarative scripts, compiled timelines
//! and the one-shot entrance sequencer.
//!
//! Everything here is driven by an external clock (`Duration` since page
//! load), so the same code runs against the terminal's wall clock and the
//! tests' virtual one.

pub mod easing;
pub mod presets;
pub mod script;
pub mod sequencer;
pub mod timeline;

pub use easing::{EaseDirection, Easing};
pub use script::{Element, Length, Offset, Props, Script, Stage, ViewportSize};
pub use sequencer::{EntranceSequencer, MountCheck, MountProbe, RetryPolicy, SequencerState};
pub use timeline::{StageSpan, Timeline, VisualState};
