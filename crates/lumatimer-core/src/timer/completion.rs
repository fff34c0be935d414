use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TimerMode;
use crate::settings::Settings;
use crate::task::TaskId;

/// Delay between a completion and the auto-started next interval.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_secs(3);

/// What the presentation layer shows when an interval runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub completed_mode: TimerMode,
    pub next_mode: TimerMode,
    pub title: String,
    pub message: String,
    pub button_label: String,
    /// Whether the next interval should start by itself after [`AUTO_ADVANCE_DELAY`].
    pub auto_advance: bool,
    /// Task that was credited with the pomodoro, if any.
    pub credited_task: Option<TaskId>,
}

impl Completion {
    pub(crate) fn new(
        completed_mode: TimerMode,
        next_mode: TimerMode,
        settings: &Settings,
        credited_task: Option<TaskId>,
    ) -> Self {
        let (title, message) = if completed_mode == TimerMode::Focus {
            ("Session Complete!", "Time for a break")
        } else {
            ("Break Complete!", "Ready to focus?")
        };
        let button_label = match next_mode {
            TimerMode::Focus => "Start Focus",
            TimerMode::ShortBreak => "Start Break",
            TimerMode::LongBreak => "Start Long Break",
        };
        let auto_advance = if next_mode == TimerMode::Focus {
            settings.auto_start_focus
        } else {
            settings.auto_start_breaks
        };

        Self {
            completed_mode,
            next_mode,
            title: title.into(),
            message: message.into(),
            button_label: button_label.into(),
            auto_advance,
            credited_task,
        }
    }

    /// Body of the desktop notification for this completion.
    pub fn notification_body(&self) -> &'static str {
        if self.completed_mode == TimerMode::Focus {
            "Time for a break!"
        } else {
            "Ready for another focus session?"
        }
    }
}
