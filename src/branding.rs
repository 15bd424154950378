//! Branding and event identity.
//!
//! This module centralizes all branding-related strings (names, paths, copy) so the
//! site can be re-themed for the next edition by changing values here.

/// The human-readable display name of the event.
///
/// Used in:
/// - The nav bar
/// - The hero headline (split into word and numeral)
/// - Help text
pub const APP_DISPLAY_NAME: &str = "Synchronize 4.0";

/// The binary/executable name (lowercase, no spaces).
pub const APP_BINARY_NAME: &str = "synchronize";

/// The directory name for application data (config, storage, logs).
///
/// Used in platform-specific paths:
/// - Linux: `~/.config/{APP_DATA_DIR}/`
/// - macOS: `~/Library/Application Support/{APP_DATA_DIR}/`
/// - Windows: `%APPDATA%\{APP_DATA_DIR}\`
pub const APP_DATA_DIR: &str = "Synchronize";

/// Headline word revealed during the hero entrance.
pub const HERO_HEADLINE: &str = "SYNCHRONIZE";

/// Headline numeral the shield lands next to, forming "4.0".
pub const HERO_NUMERAL: &str = "4.";

/// Floating tag shown above the headline.
pub const HERO_TAG: &str = "FIRST AVENGER EDITION";

/// Quote shown under the headline.
pub const HERO_QUOTE: &str = "\"I CAN DO THIS ALL DAY.\"";

/// Secondary line under the quote.
pub const HERO_TAGLINE: &str = "Join the initiative. Defend the future.";

/// Label of the primary call to action.
pub const CTA_REGISTER: &str = "REGISTER NOW ★";

/// Label of the secondary call to action (links to the gallery).
pub const CTA_GALLERY: &str = "VIEW GALLERY";

/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "synchronize.log";

/// Short description for help text.
pub const APP_DESCRIPTION: &str = "The Synchronize 4.0 event site, in your terminal";

/// Title of the picker header (the accent applies to the last word).
pub fn picker_title() -> (&'static str, &'static str) {
    ("CHOOSE YOUR ", "CHARACTER")
}

/// Line under the picker title.
pub const PICKER_SUBTITLE: &str = "Select Your Weapon";

/// Hint at the bottom of the picker.
pub const PICKER_FOOTER: &str = "Hover to Preview • Click to Equip";
