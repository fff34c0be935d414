//! Completed-focus statistics.
//!
//! Counts pomodoros and focus minutes for "today" and all time, plus a
//! per-weekday histogram (index 0 = Sunday). Nothing here resets `today`;
//! it accumulates across calendar days until cleared externally.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{self, KeyValueStore, STATS_KEY};

pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tally {
    pub pomodoros: u64,
    pub minutes: u64,
}

impl Tally {
    fn record(&mut self, minutes: u32) {
        self.pomodoros = self.pomodoros.saturating_add(1);
        self.minutes = self.minutes.saturating_add(u64::from(minutes));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub today: Tally,
    pub total: Tally,
    /// Session counts per weekday, Sunday first.
    pub weekly: [u64; 7],
}

/// One bar of the weekly chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub day: String,
    pub count: u64,
    /// Bar height relative to the busiest day, 0.0 ..= 100.0.
    pub height_pct: f64,
}

/// Read-only view of the aggregates for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub today: Tally,
    pub total: Tally,
    pub weekly: [u64; 7],
    pub chart: Vec<ChartBar>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsAggregator {
    stats: Stats,
}

impl StatsAggregator {
    pub fn new(stats: Stats) -> Self {
        Self { stats }
    }

    /// Load the persisted aggregates, or zeros if missing or malformed.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            stats: storage::load_json(store, STATS_KEY).unwrap_or_default(),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        storage::save_json(store, STATS_KEY, &self.stats)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Count one finished focus interval of `minutes` on `weekday` (0 = Sunday).
    pub fn record_completed_focus(&mut self, minutes: u32, weekday: usize) {
        self.stats.today.record(minutes);
        self.stats.total.record(minutes);
        if let Some(bucket) = self.stats.weekly.get_mut(weekday) {
            *bucket = bucket.saturating_add(1);
        } else {
            tracing::warn!(weekday, "weekday out of range, weekly bucket skipped");
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let max = self.stats.weekly.iter().copied().max().unwrap_or(0).max(1);
        let chart = self
            .stats
            .weekly
            .iter()
            .zip(DAY_LABELS)
            .map(|(&count, day)| ChartBar {
                day: day.to_string(),
                count,
                height_pct: count as f64 / max as f64 * 100.0,
            })
            .collect();

        StatsSnapshot {
            today: self.stats.today,
            total: self.stats.total,
            weekly: self.stats.weekly,
            chart,
        }
    }
}
