//! Locations and routes.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

/// A path plus optional fragment, e.g. `/team#crew`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Always starts with `/`
    pub path: String,
    /// Element id without the leading `#`; never empty
    pub fragment: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl Location {
    /// The site root, `/`.
    #[must_use]
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            fragment: None,
        }
    }

    /// Parses `path[?query][#fragment]`. The query is dropped and an empty
    /// fragment counts as none.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (input, None),
        };
        let path = rest.split_once('?').map_or(rest, |(path, _)| path);

        Self {
            path: normalize_path(path),
            fragment: fragment
                .filter(|fragment| !fragment.is_empty())
                .map(str::to_string),
        }
    }

    /// Whether this is the site root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Route this location renders.
    #[must_use]
    pub fn route(&self) -> Route {
        Route::from_path(&self.path)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(fragment) => write!(f, "{}#{fragment}", self.path),
            None => write!(f, "{}", self.path),
        }
    }
}

impl FromStr for Location {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.chars().any(char::is_whitespace) {
            bail!("Location '{s}' must not contain whitespace");
        }
        Ok(Self::parse(s))
    }
}

/// Top-level pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: hero plus the home sections
    Home,
    /// `/team`
    Team,
    /// `/gallery`
    Gallery,
    /// `/events`
    Events,
    /// Anything else
    NotFound,
}

impl Route {
    /// Route for a normalized path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Self::Home,
            "/team" => Self::Team,
            "/gallery" => Self::Gallery,
            "/events" => Self::Events,
            _ => Self::NotFound,
        }
    }

    /// Canonical path, if the route has one.
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            Self::Home => Some("/"),
            Self::Team => Some("/team"),
            Self::Gallery => Some("/gallery"),
            Self::Events => Some("/events"),
            Self::NotFound => None,
        }
    }

    /// Page title shown in the nav bar.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Team => "Team",
            Self::Gallery => "Gallery",
            Self::Events => "Events",
            Self::NotFound => "Not Found",
        }
    }
}
