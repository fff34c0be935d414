//! Wall-clock access, injectable so tests control "today".

use chrono::{DateTime, Datelike, Local};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Day of week, 0 = Sunday.
    fn weekday(&self) -> usize {
        self.now().weekday().num_days_from_sunday() as usize
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
