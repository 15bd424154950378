//! The ordered catalog of selectable characters.
//!
//! Catalog order is render order. Ids are unique. Exactly one option is the
//! default, used before the visitor has chosen anything.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::models::{CharacterOption, RgbColor};

/// Ordered, validated list of character options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    options: Vec<CharacterOption>,
    default_id: String,
}

/// On-disk catalog format.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    default: Option<String>,
    options: Vec<CharacterOption>,
}

impl Catalog {
    /// Builds a catalog, validating every option, id uniqueness and the default id.
    pub fn new(options: Vec<CharacterOption>, default_id: impl Into<String>) -> Result<Self> {
        let default_id = default_id.into();

        if options.is_empty() {
            anyhow::bail!("Character catalog cannot be empty");
        }

        let mut seen = HashSet::new();
        for option in &options {
            option.validate()?;
            if !seen.insert(option.id.as_str()) {
                anyhow::bail!("Duplicate character ID '{}' in catalog", option.id);
            }
        }

        if !seen.contains(default_id.as_str()) {
            anyhow::bail!("Default character '{default_id}' is not in the catalog");
        }

        Ok(Self {
            options,
            default_id,
        })
    }

    /// The characters shipped with the site.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |id: &str, name: &str, color: RgbColor, icon: Option<&str>| CharacterOption {
            id: id.to_string(),
            name: name.to_string(),
            color,
            icon: icon.map(str::to_string),
        };

        Self {
            options: vec![
                entry("cap", "Captain America", RgbColor::new(0x00, 0x55, 0xAA), Some("cursors/cap.png")),
                entry("ironman", "Iron Man", RgbColor::new(0xAA, 0x05, 0x05), Some("cursors/ironman.png")),
                entry("thor", "Thor", RgbColor::new(0x4A, 0x90, 0xD9), Some("cursors/thor.png")),
                entry("hulk", "Hulk", RgbColor::new(0x2E, 0x8B, 0x57), Some("cursors/hulk.png")),
                entry("widow", "Black Widow", RgbColor::new(0x00, 0x00, 0x00), Some("cursors/widow.png")),
                entry("panther", "Black Panther", RgbColor::new(0x3B, 0x1F, 0x5C), Some("cursors/panther.png")),
                entry("spidey", "Spider-Man", RgbColor::new(0xD6, 0x28, 0x28), Some("cursors/spidey.png")),
                entry("strange", "Doctor Strange", RgbColor::new(0xE0, 0x7A, 0x1F), None),
            ],
            default_id: "cap".to_string(),
        }
    }

    /// Parses a catalog from JSON: `{ "default": "cap", "options": [...] }`.
    ///
    /// When `default` is omitted the first option is the default.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).context("Failed to parse character catalog JSON")?;

        let default_id = match file.default {
            Some(id) => id,
            None => file
                .options
                .first()
                .map(|option| option.id.clone())
                .context("Character catalog cannot be empty")?,
        };

        Self::new(file.options, default_id)
    }

    /// Loads a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid catalog file: {}", path.display()))
    }

    /// All options in render order.
    #[must_use]
    pub fn options(&self) -> &[CharacterOption] {
        &self.options
    }

    /// Looks up an option by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CharacterOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Whether `id` names an option in this catalog.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Render position of an option.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.options.iter().position(|option| option.id == id)
    }

    /// Id of the default option.
    #[must_use]
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// The default option.
    #[must_use]
    pub fn default_option(&self) -> &CharacterOption {
        // Construction guarantees the default is present
        self.get(&self.default_id).unwrap_or(&self.options[0])
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Always false for a constructed catalog; provided for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates options in render order.
    pub fn iter(&self) -> std::slice::Iter<'_, CharacterOption> {
        self.options.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CharacterOption;
    type IntoIter = std::slice::Iter<'a, CharacterOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
