//! Synchronize Library
//!
//! This library provides the core of the Synchronize 4.0 event site: the
//! persisted character selection store, the character picker modal, the
//! scripted hero entrance sequencer and the fragment scroll coordinator,
//! plus the terminal front end that drives them.

// Module declarations
pub mod animation;
pub mod branding;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod picker;
pub mod scheduler;
pub mod shortcuts;
pub mod store;
pub mod tui;
