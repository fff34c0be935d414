//! Top-level controller owning every piece of LumaTimer state.
//!
//! Each mutating operation persists the affected record before returning and
//! queues [`Event`]s for the presentation layer to drain.

use chrono::Utc;

use crate::clock::{Clock, SystemClock};
use crate::display::{self, DisplayState};
use crate::error::Result;
use crate::events::Event;
use crate::notify::{Notifier, NullNotifier};
use crate::scheduler::{Scheduler, TimerHandle, VirtualScheduler};
use crate::settings::{Settings, SettingsStore};
use crate::stats::{StatsAggregator, StatsSnapshot};
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskId, TaskStore};
use crate::theme::Theme;
use crate::timer::{Completion, SessionContext, TickOutcome, TimerEngine, TimerMode, AUTO_ADVANCE_DELAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAdvance {
    handle: TimerHandle,
    next_mode: TimerMode,
}

pub struct LumaTimer<S: Scheduler> {
    store: Box<dyn KeyValueStore>,
    scheduler: S,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
    settings: SettingsStore,
    tasks: TaskStore,
    stats: StatsAggregator,
    theme: Theme,
    engine: TimerEngine,
    tick_handle: Option<TimerHandle>,
    pending_advance: Option<PendingAdvance>,
    last_completion: Option<Completion>,
    events: Vec<Event>,
}

impl<S: Scheduler> LumaTimer<S> {
    /// Load all four records from `store` and start paused in focus mode.
    ///
    /// A task still flagged active from a previous run becomes the active task.
    pub fn load(store: Box<dyn KeyValueStore>, scheduler: S) -> Self {
        let settings = SettingsStore::load(store.as_ref());
        let tasks = TaskStore::load(store.as_ref());
        let stats = StatsAggregator::load(store.as_ref());
        let theme = Theme::load(store.as_ref());

        let mut engine = TimerEngine::new(settings.current());
        engine.set_active_task(tasks.flagged_active().map(|t| t.id));

        tracing::debug!(tasks = tasks.len(), %theme, "state loaded");
        Self {
            store,
            scheduler,
            clock: Box::new(SystemClock),
            notifier: Box::new(NullNotifier),
            settings,
            tasks,
            stats,
            theme,
            engine,
            tick_handle: None,
            pending_advance: None,
            last_completion: None,
            events: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Tear down, cancelling any armed sources, and hand back the store.
    pub fn into_store(mut self) -> Box<dyn KeyValueStore> {
        self.disarm_tick();
        self.cancel_auto_advance();
        self.store
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn display_state(&self) -> DisplayState {
        let settings = self.settings.current();
        DisplayState {
            mode: self.engine.mode(),
            time_left_secs: self.engine.time_left_secs(),
            total_time_secs: self.engine.total_time_secs(),
            is_running: self.engine.is_running(),
            session_count: self.engine.session_count(),
            completed_sessions: self.engine.completed_sessions(),
            active_task_id: self.engine.resolve_active_task(&self.tasks),
            estimated_finish_time: display::estimated_finish(
                self.clock.now(),
                self.tasks.remaining_pomodoros(),
                settings.focus_duration,
            ),
        }
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn settings(&self) -> &Settings {
        self.settings.current()
    }

    pub fn setting(&self, key: &str) -> Option<String> {
        self.settings.get(key)
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The completion awaiting acknowledgement, if any.
    pub fn last_completion(&self) -> Option<&Completion> {
        self.last_completion.as_ref()
    }

    /// Mode that will auto-start when the pending delay elapses.
    pub fn pending_auto_advance(&self) -> Option<TimerMode> {
        self.pending_advance.map(|p| p.next_mode)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Queue a full state snapshot.
    pub fn emit_snapshot(&mut self) {
        let state = self.display_state();
        self.events.push(Event::StateSnapshot { state, at: Utc::now() });
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) {
        if let Some(event) = self.engine.start() {
            self.disarm_tick();
            self.tick_handle = Some(self.scheduler.every_second());
            self.events.push(event);
        }
    }

    pub fn pause(&mut self) {
        if let Some(event) = self.engine.pause() {
            self.disarm_tick();
            self.events.push(event);
        }
    }

    pub fn reset(&mut self) {
        let events = self.engine.reset();
        self.disarm_tick();
        self.events.extend(events);
    }

    /// Switch interval kind. Callers only do this while paused.
    pub fn switch_mode(&mut self, mode: TimerMode) {
        let event = self.engine.switch_mode(mode, self.settings.current());
        self.events.push(event);
    }

    /// Deliver one elapsed second.
    ///
    /// # Errors
    /// Returns an error if a completed session cannot be persisted.
    pub fn tick(&mut self) -> Result<()> {
        let weekday = self.clock.weekday();
        let outcome = self.engine.tick(SessionContext {
            settings: self.settings.current(),
            stats: &mut self.stats,
            tasks: &mut self.tasks,
            weekday,
        });

        match outcome {
            None => Ok(()),
            Some(TickOutcome::Counted { time_left_secs }) => {
                self.events.push(Event::Ticked {
                    mode: self.engine.mode(),
                    time_left_secs,
                });
                Ok(())
            }
            Some(TickOutcome::Completed(completion)) => self.finish_session(completion),
        }
    }

    /// Route a handle reported by the scheduler.
    pub fn fire(&mut self, handle: TimerHandle) -> Result<()> {
        if self.tick_handle == Some(handle) {
            return self.tick();
        }
        match self.pending_advance {
            Some(pending) if pending.handle == handle => {
                self.pending_advance = None;
                self.last_completion = None;
                tracing::debug!(next = %pending.next_mode, "auto-advancing");
                self.switch_mode(pending.next_mode);
                self.start();
            }
            _ => tracing::trace!(%handle, "ignoring stale timer handle"),
        }
        Ok(())
    }

    /// Close the completion notice without starting the next interval.
    pub fn dismiss_completion(&mut self) {
        self.cancel_auto_advance();
        self.last_completion = None;
    }

    /// Start the interval the last completion suggested.
    ///
    /// Returns the mode started, or `None` if no completion was pending.
    pub fn accept_completion(&mut self) -> Option<TimerMode> {
        let completion = self.last_completion.take()?;
        if let Some(pending) = self.pending_advance.take() {
            self.scheduler.cancel(pending.handle);
        }
        self.switch_mode(completion.next_mode);
        self.start();
        Some(completion.next_mode)
    }

    // ── Task commands ────────────────────────────────────────────────

    /// Add a task; blank text is ignored and returns `None`.
    pub fn add_task(&mut self, text: &str, estimate: i64) -> Result<Option<TaskId>> {
        let Some(id) = self.tasks.add(text, estimate) else {
            tracing::debug!("ignoring blank task");
            return Ok(None);
        };
        self.persist_tasks()?;
        Ok(Some(id))
    }

    pub fn toggle_task(&mut self, id: TaskId) -> Result<bool> {
        let found = self.tasks.toggle_completed(id);
        if found {
            self.persist_tasks()?;
        }
        Ok(found)
    }

    /// Make `id` the active task.
    ///
    /// All active flags are cleared first. A missing or completed target
    /// returns `None` and leaves the timer's active task id untouched.
    pub fn set_active_task(&mut self, id: TaskId) -> Result<Option<TaskId>> {
        let resolved = self.tasks.set_active(id);
        if resolved.is_some() {
            self.engine.set_active_task(resolved);
        }
        self.persist_tasks()?;
        Ok(resolved)
    }

    /// Delete a task. If it was active, the timer's reference now dangles
    /// and is treated as absent.
    pub fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        let found = self.tasks.delete(id);
        if found {
            self.persist_tasks()?;
        }
        Ok(found)
    }

    pub fn clear_completed_tasks(&mut self) -> Result<usize> {
        let removed = self.tasks.clear_completed();
        if removed > 0 {
            self.persist_tasks()?;
        }
        Ok(removed)
    }

    // ── Settings / theme ─────────────────────────────────────────────

    /// Replace the settings wholesale and persist them.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings.apply(settings);
        self.after_settings_change()
    }

    /// Set one setting from its string form.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.settings.set(key, value)?;
        self.after_settings_change()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        theme.save(self.store.as_mut())?;
        self.theme = theme;
        self.events.push(Event::ThemeChanged { theme, at: Utc::now() });
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_session(&mut self, completion: Completion) -> Result<()> {
        self.disarm_tick();
        self.cancel_auto_advance();

        // A failed write is reported after the completion is queued.
        let persisted = self.persist_completion(&completion);

        self.announce(&completion);
        self.events.push(Event::SessionCompleted {
            completion: completion.clone(),
            at: Utc::now(),
        });

        if completion.auto_advance {
            let handle = self.scheduler.once(AUTO_ADVANCE_DELAY);
            self.pending_advance = Some(PendingAdvance {
                handle,
                next_mode: completion.next_mode,
            });
            self.events.push(Event::AutoAdvanceScheduled {
                next_mode: completion.next_mode,
                delay_secs: AUTO_ADVANCE_DELAY.as_secs(),
                at: Utc::now(),
            });
        }
        self.last_completion = Some(completion);
        persisted
    }

    fn persist_completion(&mut self, completion: &Completion) -> Result<()> {
        let mut saved = Ok(());
        if completion.completed_mode == TimerMode::Focus {
            saved = self.stats.save(self.store.as_mut());
            let stats = self.stats.stats();
            self.events.push(Event::StatsChanged {
                today_pomodoros: stats.today.pomodoros,
                total_pomodoros: stats.total.pomodoros,
                at: Utc::now(),
            });
        }
        if completion.credited_task.is_some() {
            saved = saved.and(self.persist_tasks());
        }
        if let Err(e) = &saved {
            tracing::error!(error = %e, "failed to persist completed session");
        }
        saved
    }

    fn announce(&self, completion: &Completion) {
        if self.settings.current().sound_enabled {
            if let Err(e) = self.notifier.play_sound() {
                tracing::warn!(error = %e, "completion sound failed");
            }
        }
        if let Err(e) = self
            .notifier
            .notify(display::APP_NAME, completion.notification_body())
        {
            tracing::warn!(error = %e, "completion notification failed");
        }
    }

    fn after_settings_change(&mut self) -> Result<()> {
        self.settings.save(self.store.as_mut())?;
        if self.engine.apply_settings(self.settings.current()) {
            self.events.push(Event::ModeSwitched {
                mode: self.engine.mode(),
                total_time_secs: self.engine.total_time_secs(),
                at: Utc::now(),
            });
        }
        self.events.push(Event::SettingsChanged {
            settings: self.settings.current().clone(),
            at: Utc::now(),
        });
        Ok(())
    }

    fn persist_tasks(&mut self) -> Result<()> {
        self.tasks.save(self.store.as_mut())?;
        self.events.push(Event::TasksChanged {
            count: self.tasks.len(),
            at: Utc::now(),
        });
        Ok(())
    }

    fn disarm_tick(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn cancel_auto_advance(&mut self) {
        if let Some(pending) = self.pending_advance.take() {
            self.scheduler.cancel(pending.handle);
            self.events.push(Event::AutoAdvanceCancelled {
                next_mode: pending.next_mode,
                at: Utc::now(),
            });
        }
    }
}

impl LumaTimer<VirtualScheduler> {
    /// Advance virtual time second by second, routing every fired handle.
    pub fn advance(&mut self, secs: u64) -> Result<()> {
        for _ in 0..secs {
            for handle in self.scheduler.advance(1) {
                self.fire(handle)?;
            }
        }
        Ok(())
    }
}
