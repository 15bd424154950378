//! Selectable characters (cursor themes) offered by the picker.

use crate::models::RgbColor;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Glyph rendered in place of a character icon that is absent or cannot be found.
pub const PLACEHOLDER_GLYPH: &str = "◌";

/// Maximum display name length.
const MAX_NAME_LEN: usize = 40;

/// One selectable character.
///
/// # Validation
///
/// - ID must be unique within a [`Catalog`](crate::models::Catalog)
/// - ID format: lowercase ASCII letters, digits and hyphens, no leading/trailing hyphen
/// - Name must be non-empty, max 40 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterOption {
    /// Stable identifier (e.g., "cap", "widow")
    pub id: String,
    /// Display name (e.g., "Captain America")
    pub name: String,
    /// Theme color for the card and the selection highlight
    pub color: RgbColor,
    /// Path of the icon asset, relative to the assets directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl CharacterOption {
    /// Creates a new option without an icon.
    ///
    /// # Examples
    ///
    /// ```
    /// use synchronize::models::{CharacterOption, RgbColor};
    ///
    /// let cap = CharacterOption::new("cap", "Captain America", RgbColor::new(0, 85, 170))
    ///     .unwrap()
    ///     .with_icon("cursors/cap.png");
    /// assert_eq!(cap.icon.as_deref(), Some("cursors/cap.png"));
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: RgbColor) -> Result<Self> {
        let id = id.into();
        let name = name.into();

        Self::validate_id(&id)?;
        Self::validate_name(&name)?;

        Ok(Self {
            id,
            name,
            color,
            icon: None,
        })
    }

    /// Attaches an icon asset path.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Validates fields of an option built outside [`CharacterOption::new`] (e.g. deserialized).
    pub fn validate(&self) -> Result<()> {
        Self::validate_id(&self.id)?;
        Self::validate_name(&self.name)
    }

    fn validate_id(id: &str) -> Result<()> {
        if id.is_empty() {
            anyhow::bail!("Character ID cannot be empty");
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            anyhow::bail!("Character ID '{id}' must use lowercase letters, digits and hyphens");
        }

        if id.starts_with('-') || id.ends_with('-') {
            anyhow::bail!("Character ID '{id}' cannot start or end with a hyphen");
        }

        Ok(())
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("Character name cannot be empty");
        }

        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            anyhow::bail!(
                "Character name '{name}' exceeds maximum length of {MAX_NAME_LEN} characters (got {len})"
            );
        }

        Ok(())
    }

    /// Short glyph for the pointer overlay: the first letter of the name.
    #[must_use]
    pub fn monogram(&self) -> char {
        self.name
            .chars()
            .find(char::is_ascii_alphanumeric)
            .map_or('•', |c| c.to_ascii_uppercase())
    }
}
