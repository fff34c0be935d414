//! Wiring of the core controller for one CLI invocation.

use lumatimer_core::{AppConfig, LumaTimer, SqliteStore, TimerHandle, TokioScheduler};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::notifier::TerminalNotifier;

pub type App = LumaTimer<TokioScheduler>;
pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the store and load every record. Must run inside the tokio runtime.
pub fn open(config: &AppConfig) -> CliResult<(App, UnboundedReceiver<TimerHandle>)> {
    let store = SqliteStore::open(config)?;
    let (scheduler, fired) = TokioScheduler::new();
    let app = LumaTimer::load(Box::new(store), scheduler)
        .with_notifier(TerminalNotifier::from_config(&config.notifications));
    Ok((app, fired))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
