use std::collections::BTreeMap;
use std::time::Duration;

use super::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: u64,
    period: Option<u64>,
}

/// Scheduler over virtual seconds, advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_secs: u64,
    next_handle: u64,
    entries: BTreeMap<TimerHandle, Entry>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual seconds elapsed since creation.
    pub fn now_secs(&self) -> u64 {
        self.now_secs
    }

    /// Number of armed sources.
    pub fn armed(&self) -> usize {
        self.entries.len()
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Move time forward, returning every handle that fired, oldest first.
    pub fn advance(&mut self, secs: u64) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for _ in 0..secs {
            self.now_secs += 1;
            let now = self.now_secs;
            let due: Vec<TimerHandle> = self
                .entries
                .iter()
                .filter(|(_, e)| e.due == now)
                .map(|(h, _)| *h)
                .collect();
            for handle in due {
                match self.entries.get(&handle).and_then(|e| e.period) {
                    Some(period) => {
                        if let Some(entry) = self.entries.get_mut(&handle) {
                            entry.due = now + period;
                        }
                    }
                    None => {
                        self.entries.remove(&handle);
                    }
                }
                fired.push(handle);
            }
        }
        fired
    }

    fn arm(&mut self, delay_secs: u64, period: Option<u64>) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.entries.insert(
            handle,
            Entry {
                due: self.now_secs + delay_secs.max(1),
                period,
            },
        );
        handle
    }
}

impl Scheduler for VirtualScheduler {
    fn every_second(&mut self) -> TimerHandle {
        self.arm(1, Some(1))
    }

    fn once(&mut self, delay: Duration) -> TimerHandle {
        // Round partial seconds up so a delay never fires early.
        let secs = delay.as_secs() + u64::from(delay.subsec_nanos() > 0);
        self.arm(secs, None)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.remove(&handle);
    }
}
