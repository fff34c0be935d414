use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// The three interval kinds a session cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Focus)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short-break",
            TimerMode::LongBreak => "long-break",
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Focus
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(TimerMode::Focus),
            "short-break" | "short_break" | "short" => Ok(TimerMode::ShortBreak),
            "long-break" | "long_break" | "long" => Ok(TimerMode::LongBreak),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}
