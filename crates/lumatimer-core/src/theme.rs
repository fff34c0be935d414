use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValidationError};
use crate::storage::{self, KeyValueStore, THEME_KEY};

/// Visual theme preference. Stored as a bare `light`/`dark` string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = storage::load_raw(store, THEME_KEY) else {
            return Theme::default();
        };
        raw.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unknown theme preference, using light");
            Theme::default()
        })
    }

    pub fn save(self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.set(THEME_KEY, self.as_str())?;
        Ok(())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::UnknownTheme(other.to_string())),
        }
    }
}
