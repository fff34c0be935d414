//! Session state machine.
//!
//! The engine counts down in whole seconds and does not own a clock: the
//! caller delivers one `tick()` per elapsed second while it is running.
//!
//! ## State Transitions
//!
//! ```text
//! {focus, short-break, long-break} x {paused, running}
//!
//! paused --start--> running --pause--> paused
//! running --tick @ 0--> paused (next mode decided, not yet switched)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(&settings);
//! engine.start();
//! // Once per second:
//! engine.tick(SessionContext { settings: &settings, stats: &mut stats, tasks: &mut tasks, weekday });
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{Completion, TimerMode};
use crate::events::Event;
use crate::settings::Settings;
use crate::stats::StatsAggregator;
use crate::task::{TaskId, TaskStore};

/// Stores a completing session commits into.
pub struct SessionContext<'a> {
    pub settings: &'a Settings,
    pub stats: &'a mut StatsAggregator,
    pub tasks: &'a mut TaskStore,
    /// Day of week for the weekly bucket, 0 = Sunday.
    pub weekday: usize,
}

/// Result of a tick delivered while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second was taken off the countdown.
    Counted { time_left_secs: u64 },
    /// The countdown was already at zero and the session was committed.
    Completed(Completion),
}

/// Core timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: TimerMode,
    time_left_secs: u64,
    total_time_secs: u64,
    running: bool,
    /// Starts at 1, bumped once per completed break.
    session_count: u32,
    /// Completed focus intervals; drives long-break cadence.
    completed_sessions: u32,
    /// Weak reference: the task may have been deleted since it was chosen.
    active_task_id: Option<TaskId>,
}

impl TimerEngine {
    /// Create an engine in paused focus mode with a full countdown.
    pub fn new(settings: &Settings) -> Self {
        let total_time_secs = duration_secs(settings, TimerMode::Focus);
        Self {
            mode: TimerMode::Focus,
            time_left_secs: total_time_secs,
            total_time_secs,
            running: false,
            session_count: 1,
            completed_sessions: 0,
            active_task_id: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn total_time_secs(&self) -> u64 {
        self.total_time_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// The remembered active task id, without checking that it still exists.
    pub fn active_task_id(&self) -> Option<TaskId> {
        self.active_task_id
    }

    /// The active task id if it still resolves to a task.
    pub fn resolve_active_task(&self, tasks: &TaskStore) -> Option<TaskId> {
        self.active_task_id.filter(|id| tasks.contains(*id))
    }

    pub fn set_active_task(&mut self, id: Option<TaskId>) {
        self.active_task_id = id;
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        tracing::debug!(mode = %self.mode, time_left = self.time_left_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(mode = %self.mode, time_left = self.time_left_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Pause and refill the countdown for the current mode.
    ///
    /// Returns the pause event (if the timer was running) followed by the reset.
    pub fn reset(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.pause().into_iter().collect();
        self.time_left_secs = self.total_time_secs;
        events.push(Event::TimerReset {
            mode: self.mode,
            total_time_secs: self.total_time_secs,
            at: Utc::now(),
        });
        events
    }

    /// Select `mode` and refill the countdown from `settings`.
    ///
    /// Does not touch the running flag; callers only switch while paused.
    pub fn switch_mode(&mut self, mode: TimerMode, settings: &Settings) -> Event {
        self.mode = mode;
        self.total_time_secs = duration_secs(settings, mode);
        self.time_left_secs = self.total_time_secs;
        tracing::debug!(%mode, total = self.total_time_secs, "mode switched");
        Event::ModeSwitched {
            mode,
            total_time_secs: self.total_time_secs,
            at: Utc::now(),
        }
    }

    /// Pick up new durations. Only takes effect while paused.
    pub fn apply_settings(&mut self, settings: &Settings) -> bool {
        if self.running {
            return false;
        }
        self.total_time_secs = duration_secs(settings, self.mode);
        self.time_left_secs = self.total_time_secs;
        true
    }

    /// Deliver one elapsed second. Ignored while paused.
    pub fn tick(&mut self, ctx: SessionContext<'_>) -> Option<TickOutcome> {
        if !self.running {
            return None;
        }
        if self.time_left_secs > 0 {
            self.time_left_secs -= 1;
            return Some(TickOutcome::Counted {
                time_left_secs: self.time_left_secs,
            });
        }
        Some(TickOutcome::Completed(self.complete_session(ctx)))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_session(&mut self, ctx: SessionContext<'_>) -> Completion {
        self.running = false;

        let completed_mode = self.mode;
        let mut credited_task = None;

        let next_mode = match completed_mode {
            TimerMode::Focus => {
                self.completed_sessions += 1;
                ctx.stats
                    .record_completed_focus(ctx.settings.focus_duration, ctx.weekday);

                if let Some(id) = self.active_task_id {
                    if ctx.tasks.credit_pomodoro(id).is_some() {
                        credited_task = Some(id);
                    } else {
                        tracing::debug!(task_id = id, "active task no longer exists");
                    }
                }

                let cadence = ctx.settings.sessions_until_long_break.max(1);
                if self.completed_sessions % cadence == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                self.session_count += 1;
                TimerMode::Focus
            }
        };

        tracing::info!(
            completed = %completed_mode,
            next = %next_mode,
            completed_sessions = self.completed_sessions,
            session_count = self.session_count,
            "session complete"
        );
        Completion::new(completed_mode, next_mode, ctx.settings, credited_task)
    }
}

fn duration_secs(settings: &Settings, mode: TimerMode) -> u64 {
    u64::from(settings.duration_for(mode)) * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        settings: Settings,
        stats: StatsAggregator,
        tasks: TaskStore,
    }

    impl Fixture {
        fn new(settings: Settings) -> Self {
            Self {
                settings,
                stats: StatsAggregator::default(),
                tasks: TaskStore::new(),
            }
        }

        fn tick(&mut self, engine: &mut TimerEngine) -> Option<TickOutcome> {
            engine.tick(SessionContext {
                settings: &self.settings,
                stats: &mut self.stats,
                tasks: &mut self.tasks,
                weekday: 2,
            })
        }

        fn run_out(&mut self, engine: &mut TimerEngine) -> Completion {
            engine.start();
            loop {
                match self.tick(engine) {
                    Some(TickOutcome::Counted { .. }) => continue,
                    Some(TickOutcome::Completed(c)) => return c,
                    None => panic!("engine stopped without completing"),
                }
            }
        }
    }

    fn short_settings() -> Settings {
        Settings {
            focus_duration: 1,
            short_break_duration: 1,
            long_break_duration: 2,
            sessions_until_long_break: 2,
            ..Settings::default()
        }
    }

    #[test]
    fn start_pause_are_idempotent() {
        let mut engine = TimerEngine::new(&Settings::default());
        assert!(!engine.is_running());
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert!(engine.is_running());
        assert!(engine.pause().is_some());
        assert!(engine.pause().is_none());
        assert!(!engine.is_running());
    }

    #[test]
    fn new_engine_uses_focus_duration() {
        let engine = TimerEngine::new(&short_settings());
        assert_eq!(engine.mode(), TimerMode::Focus);
        assert_eq!(engine.total_time_secs(), 60);
        assert_eq!(engine.time_left_secs(), 60);
        assert_eq!(engine.session_count(), 1);
        assert_eq!(engine.completed_sessions(), 0);
    }

    #[test]
    fn tick_ignored_while_paused() {
        let mut fx = Fixture::new(short_settings());
        let mut engine = TimerEngine::new(&fx.settings);
        assert!(fx.tick(&mut engine).is_none());
        assert_eq!(engine.time_left_secs(), 60);
    }

    #[test]
    fn tick_decrements_then_completes_once() {
        let mut fx = Fixture::new(short_settings());
        let mut engine = TimerEngine::new(&fx.settings);
        engine.start();
        for expected in (0..60).rev() {
            assert_eq!(
                fx.tick(&mut engine),
                Some(TickOutcome::Counted { time_left_secs: expected })
            );
        }
        assert!(matches!(fx.tick(&mut engine), Some(TickOutcome::Completed(_))));
        assert_eq!(engine.time_left_secs(), 0);
        assert!(!engine.is_running());
        assert!(fx.tick(&mut engine).is_none());
        assert_eq!(fx.stats.stats().total.pomodoros, 1);
    }

    #[test]
    fn reset_refills_without_changing_mode() {
        let mut fx = Fixture::new(short_settings());
        let mut engine = TimerEngine::new(&fx.settings);
        engine.switch_mode(TimerMode::LongBreak, &fx.settings);
        engine.start();
        fx.tick(&mut engine);
        fx.tick(&mut engine);
        let events = engine.reset();
        assert_eq!(events.len(), 2);
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), TimerMode::LongBreak);
        assert_eq!(engine.time_left_secs(), 120);
    }

    #[test]
    fn switch_mode_keeps_running_flag() {
        let settings = short_settings();
        let mut engine = TimerEngine::new(&settings);
        engine.start();
        engine.switch_mode(TimerMode::ShortBreak, &settings);
        assert!(engine.is_running());
        assert_eq!(engine.total_time_secs(), 60);
    }

    #[test]
    fn cadence_alternates_short_and_long() {
        let mut fx = Fixture::new(short_settings());
        let mut engine = TimerEngine::new(&fx.settings);

        let first = fx.run_out(&mut engine);
        assert_eq!(first.next_mode, TimerMode::ShortBreak);
        engine.switch_mode(first.next_mode, &fx.settings);
        let brk = fx.run_out(&mut engine);
        assert_eq!(brk.next_mode, TimerMode::Focus);
        assert_eq!(engine.session_count(), 2);

        engine.switch_mode(TimerMode::Focus, &fx.settings);
        let second = fx.run_out(&mut engine);
        assert_eq!(second.next_mode, TimerMode::LongBreak);
        assert_eq!(engine.completed_sessions(), 2);
    }

    #[test]
    fn break_completion_does_not_touch_stats() {
        let mut fx = Fixture::new(short_settings());
        let mut engine = TimerEngine::new(&fx.settings);
        engine.switch_mode(TimerMode::ShortBreak, &fx.settings);
        let c = fx.run_out(&mut engine);
        assert_eq!(c.completed_mode, TimerMode::ShortBreak);
        assert_eq!(fx.stats.stats().total.pomodoros, 0);
        assert_eq!(engine.completed_sessions(), 0);
    }

    #[test]
    fn focus_completion_credits_active_task() {
        let mut fx = Fixture::new(short_settings());
        let id = fx.tasks.add("Write report", 2).unwrap();
        let mut engine = TimerEngine::new(&fx.settings);
        engine.set_active_task(fx.tasks.set_active(id));

        let c = fx.run_out(&mut engine);
        assert_eq!(c.credited_task, Some(id));
        let task = fx.tasks.get(id).unwrap();
        assert_eq!(task.completed_pomodoros, 1);
        assert!(!task.completed);
    }

    #[test]
    fn deleted_active_task_is_skipped() {
        let mut fx = Fixture::new(short_settings());
        let id = fx.tasks.add("Gone", 1).unwrap();
        let mut engine = TimerEngine::new(&fx.settings);
        engine.set_active_task(fx.tasks.set_active(id));
        fx.tasks.delete(id);
        assert_eq!(engine.resolve_active_task(&fx.tasks), None);

        let c = fx.run_out(&mut engine);
        assert_eq!(c.credited_task, None);
        assert_eq!(fx.stats.stats().total.pomodoros, 1);
    }

    #[test]
    fn apply_settings_only_while_paused() {
        let mut engine = TimerEngine::new(&Settings::default());
        let longer = Settings {
            focus_duration: 50,
            ..Settings::default()
        };
        engine.start();
        assert!(!engine.apply_settings(&longer));
        assert_eq!(engine.total_time_secs(), 25 * 60);
        engine.pause();
        assert!(engine.apply_settings(&longer));
        assert_eq!(engine.total_time_secs(), 50 * 60);
        assert_eq!(engine.time_left_secs(), 50 * 60);
    }
}
