use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::DisplayState;
use crate::settings::Settings;
use crate::theme::Theme;
use crate::timer::{Completion, TimerMode};

/// Every state change in the core produces an Event.
/// The presentation layer drains them after each call and re-renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        total_time_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second counted down.
    Ticked {
        mode: TimerMode,
        time_left_secs: u64,
    },
    ModeSwitched {
        mode: TimerMode,
        total_time_secs: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        completion: Completion,
        at: DateTime<Utc>,
    },
    /// The next interval will start by itself unless the completion is dismissed.
    AutoAdvanceScheduled {
        next_mode: TimerMode,
        delay_secs: u64,
        at: DateTime<Utc>,
    },
    AutoAdvanceCancelled {
        next_mode: TimerMode,
        at: DateTime<Utc>,
    },
    TasksChanged {
        count: usize,
        at: DateTime<Utc>,
    },
    StatsChanged {
        today_pomodoros: u64,
        total_pomodoros: u64,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        settings: Settings,
        at: DateTime<Utc>,
    },
    ThemeChanged {
        theme: Theme,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: DisplayState,
        at: DateTime<Utc>,
    },
}
