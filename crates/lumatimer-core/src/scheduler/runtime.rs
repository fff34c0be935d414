use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use super::{Scheduler, TimerHandle};

/// Wall-clock scheduler on the tokio runtime.
///
/// Fired handles arrive on the receiver returned by [`TokioScheduler::new`].
/// Arming a source spawns a task, so it must be called inside a runtime.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerHandle>,
    next_handle: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            next_handle: 0,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }

    fn next(&mut self) -> TimerHandle {
        self.next_handle += 1;
        TimerHandle(self.next_handle)
    }
}

impl Scheduler for TokioScheduler {
    fn every_second(&mut self) -> TimerHandle {
        let handle = self.next();
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn once(&mut self, delay: Duration) -> TimerHandle {
        let handle = self.next();
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(handle);
        });
        self.tasks.insert(handle, task);
        // Finished one-shot tasks are pruned lazily here.
        self.tasks.retain(|_, t| !t.is_finished());
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
