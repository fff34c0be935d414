//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use chrono::{Local, TimeZone};
use lumatimer_core::{
    FixedClock, KeyValueStore, LumaTimer, MemoryStore, NotifyError, Notifier, Settings,
    SettingsStore, StorageError, VirtualScheduler,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Wednesday, weekly bucket 3.
pub fn wednesday() -> FixedClock {
    FixedClock(Local.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap())
}

pub fn app_with(settings: Settings) -> LumaTimer<VirtualScheduler> {
    let mut store = MemoryStore::new();
    SettingsStore::new(settings).save(&mut store).unwrap();
    reopen(Box::new(store))
}

pub fn app() -> LumaTimer<VirtualScheduler> {
    app_with(Settings::default())
}

pub fn reopen(store: Box<dyn KeyValueStore>) -> LumaTimer<VirtualScheduler> {
    LumaTimer::load(store, VirtualScheduler::new()).with_clock(wednesday())
}

/// Run the current interval from full to completion (one extra tick at zero).
pub fn run_interval(app: &mut LumaTimer<VirtualScheduler>) {
    let secs = app.display_state().time_left_secs + 1;
    app.start();
    app.advance(secs).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Sound,
    Notify(String, String),
}

/// Notifier that records calls and optionally fails them all.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub fail: bool,
}

impl Notifier for RecordingNotifier {
    fn play_sound(&self) -> Result<(), NotifyError> {
        self.calls.borrow_mut().push(Call::Sound);
        if self.fail {
            return Err(NotifyError::Unavailable("no audio device".into()));
        }
        Ok(())
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.calls
            .borrow_mut()
            .push(Call::Notify(title.into(), body.into()));
        if self.fail {
            return Err(NotifyError::Unavailable("permission denied".into()));
        }
        Ok(())
    }
}

/// Memory store whose writes start failing once `fail` is set.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail: Rc<Cell<bool>>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail.get() {
            return Err(StorageError::Locked);
        }
        self.inner.set(key, value)
    }
}
