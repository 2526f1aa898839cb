use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Evaluate,
    FlipBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub kind: TaskKind,
    pub due: Duration,
}

/// Delayed tasks on a logical clock the host moves forward.
#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, kind: TaskKind, delay: Duration) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            kind,
            due: self.now.saturating_add(delay),
        });
        id
    }

    /// Returns whether the task was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn get(&self, id: TaskId) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Removes the earliest task due at or before `until` and moves the clock
    /// to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<ScheduledTask> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= until)
            .min_by_key(|(_, task)| (task.due, task.id))
            .map(|(idx, _)| idx)?;
        let task = self.tasks.remove(idx);
        if task.due > self.now {
            self.now = task.due;
        }
        Some(task)
    }

    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}
