//! Error taxonomy for the site core.
//!
//! None of these are fatal. Each is handled where it is raised and logged;
//! the worst outcome is a page that is visually incomplete.

use thiserror::Error;

/// Recoverable conditions raised by the store, the sequencer and the scroll coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// `select` was called with an id that is not in the catalog.
    #[error("Unknown character option '{0}'")]
    InvalidOption(String),

    /// The sequencer's anchor element is not in the render tree yet.
    #[error("Animation target '{0}' is not mounted")]
    TargetNotMounted(String),

    /// A fragment navigation named an element that does not exist.
    #[error("Scroll target '#{0}' does not exist")]
    ScrollTargetMissing(String),
}
