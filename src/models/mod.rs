//! Data models for the character catalog.
//!
//! Models are independent of the store, the picker and the UI.

pub mod catalog;
pub mod character;
pub mod rgb;

pub use catalog::Catalog;
pub use character::{CharacterOption, PLACEHOLDER_GLYPH};
pub use rgb::RgbColor;
