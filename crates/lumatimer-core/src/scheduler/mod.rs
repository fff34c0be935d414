//! Periodic and one-shot timer sources.
//!
//! The controller arms a one-second periodic source while the timer runs and
//! a one-shot source for auto-advance. A scheduler never calls back into the
//! controller directly; it reports fired [`TimerHandle`]s and whoever drives
//! the loop hands them to `LumaTimer::fire`. A handle that was cancelled may
//! still be reported once; the controller ignores handles it does not own.

mod runtime;
mod virtual_time;

pub use runtime::TokioScheduler;
pub use virtual_time::VirtualScheduler;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifies one armed timer source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub(crate) u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

pub trait Scheduler {
    /// Arm a source that fires once per second until cancelled.
    fn every_second(&mut self) -> TimerHandle;

    /// Arm a source that fires once after `delay`.
    fn once(&mut self, delay: Duration) -> TimerHandle;

    /// Disarm a source. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}
