//! Ordered task list with pomodoro estimates.
//!
//! Ids are positive integers handed out from a monotonically increasing
//! counter; after a load the counter resumes at the largest stored id + 1.
//! At most one task carries the `active` flag.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{self, KeyValueStore, TASKS_KEY};

pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    /// Planned pomodoros.
    pub estimate: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_pomodoros: u32,
    #[serde(default)]
    pub active: bool,
}

impl Task {
    /// Pomodoros still planned for this task.
    pub fn remaining_pomodoros(&self) -> u32 {
        self.estimate.saturating_sub(self.completed_pomodoros)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: TaskId,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Adopt a loaded list; new ids continue after the highest one.
    ///
    /// If the highest id leaves no room for another, the list is renumbered
    /// from 1 in stored order.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        let Some(max) = tasks.iter().map(|t| t.id).max() else {
            return Self::new();
        };
        let next_id = match max.checked_add(1) {
            Some(next) => next,
            None => {
                tracing::warn!(count = tasks.len(), "task ids exhausted, renumbering");
                for (task, id) in tasks.iter_mut().zip(1..) {
                    task.id = id;
                }
                tasks.len() as TaskId + 1
            }
        };
        Self { tasks, next_id }
    }

    /// Load the persisted list, or an empty one if it is missing or malformed.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        storage::load_json::<Vec<Task>>(store, TASKS_KEY)
            .map(Self::from_tasks)
            .unwrap_or_default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        storage::save_json(store, TASKS_KEY, &self.tasks)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// The task carrying the `active` flag, if any.
    pub fn flagged_active(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.active)
    }

    /// Sum of remaining pomodoros over tasks not yet completed.
    pub fn remaining_pomodoros(&self) -> u64 {
        self.tasks
            .iter()
            .filter(|t| !t.completed)
            .map(|t| u64::from(t.remaining_pomodoros()))
            .sum()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a task. Blank text is rejected; the estimate is clamped to
    /// `1..=u32::MAX`.
    pub fn add(&mut self, text: &str, estimate: i64) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let estimate = u32::try_from(estimate.max(1)).unwrap_or(u32::MAX);

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            estimate,
            completed: false,
            completed_pomodoros: 0,
            active: false,
        });
        Some(id)
    }

    /// Flip the completed flag regardless of pomodoro progress.
    pub fn toggle_completed(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Clear every active flag, then activate `id` unless it is missing or completed.
    pub fn set_active(&mut self, id: TaskId) -> Option<TaskId> {
        for task in &mut self.tasks {
            task.active = false;
        }
        let task = self.tasks.iter_mut().find(|t| t.id == id && !t.completed)?;
        task.active = true;
        Some(task.id)
    }

    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Remove every completed task, returning how many were dropped.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    /// Add one finished pomodoro to `id`, completing it once the estimate is reached.
    pub fn credit_pomodoro(&mut self, id: TaskId) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed_pomodoros = task.completed_pomodoros.saturating_add(1);
        if task.completed_pomodoros >= task.estimate {
            task.completed = true;
        }
        Some(&*task)
    }
}
