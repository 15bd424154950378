//! Routing and fragment scrolling.

pub mod location;
pub mod scroll;

pub use location::{Location, Route};
pub use scroll::{ScrollBehavior, ScrollCoordinator, ScrollPlan, ScrollTarget, ScrollViewport};
