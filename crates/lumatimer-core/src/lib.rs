//! # LumaTimer Core Library
//!
//! Headless core of the LumaTimer Pomodoro timer: alternating focus and break
//! intervals, task tracking against those intervals, and persisted usage
//! statistics. Rendering is left to a collaborator (the CLI in this
//! workspace) that drives the core through [`LumaTimer`] and renders the
//! [`Event`]s it drains.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a second-granularity state machine; the caller
//!   delivers one `tick()` per elapsed second while it runs
//! - **Stores**: settings, tasks, stats and theme, each one record in a
//!   [`KeyValueStore`]
//! - **Scheduler**: injected periodic/one-shot timer sources, either real
//!   ([`TokioScheduler`]) or virtual ([`VirtualScheduler`]) for tests
//!
//! ## Key Components
//!
//! - [`LumaTimer`]: Top-level controller owning all state
//! - [`TimerEngine`]: Session state machine
//! - [`TaskStore`], [`StatsAggregator`], [`SettingsStore`]: the stores
//! - [`AppConfig`]: TOML configuration for the host process

pub mod clock;
pub mod controller;
pub mod display;
pub mod error;
pub mod events;
pub mod notify;
pub mod scheduler;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod task;
pub mod theme;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::LumaTimer;
pub use display::{format_time, DisplayState};
pub use error::{ConfigError, CoreError, NotifyError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{Notifier, NullNotifier};
pub use scheduler::{Scheduler, TimerHandle, TokioScheduler, VirtualScheduler};
pub use settings::{Settings, SettingsStore};
pub use stats::{ChartBar, Stats, StatsAggregator, StatsSnapshot, Tally};
pub use storage::{AppConfig, KeyValueStore, MemoryStore, SqliteStore};
pub use task::{Task, TaskId, TaskStore};
pub use theme::Theme;
pub use timer::{Completion, TimerEngine, TimerMode, AUTO_ADVANCE_DELAY};
