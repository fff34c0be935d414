//! What the presentation layer renders.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;
use crate::timer::TimerMode;

pub const APP_NAME: &str = "LumaTimer";
pub const IDLE_TITLE: &str = "LumaTimer - Pomodoro Focus Timer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub mode: TimerMode,
    pub time_left_secs: u64,
    pub total_time_secs: u64,
    pub is_running: bool,
    pub session_count: u32,
    pub completed_sessions: u32,
    /// Active task, only if it still exists.
    pub active_task_id: Option<TaskId>,
    /// When the remaining planned pomodoros would be done if started now.
    pub estimated_finish_time: Option<DateTime<Local>>,
}

impl DisplayState {
    /// Fraction of the interval still left, 1.0 at the start.
    pub fn progress(&self) -> f64 {
        if self.total_time_secs == 0 {
            return 0.0;
        }
        self.time_left_secs as f64 / self.total_time_secs as f64
    }

    pub fn time_text(&self) -> String {
        format_time(self.time_left_secs)
    }

    pub fn window_title(&self) -> String {
        if self.is_running {
            format!("{} - {APP_NAME}", self.time_text())
        } else {
            IDLE_TITLE.to_string()
        }
    }
}

/// `MM:SS`, minutes unbounded.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `now + remaining_pomodoros * focus_minutes`, or `None` when nothing is planned.
pub fn estimated_finish(
    now: DateTime<Local>,
    remaining_pomodoros: u64,
    focus_minutes: u32,
) -> Option<DateTime<Local>> {
    if remaining_pomodoros == 0 {
        return None;
    }
    let minutes = i64::try_from(remaining_pomodoros)
        .ok()?
        .checked_mul(i64::from(focus_minutes))?;
    now.checked_add_signed(Duration::try_minutes(minutes)?)
}
