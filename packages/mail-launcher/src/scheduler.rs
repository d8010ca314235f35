//! Deterministic virtual-clock timer queue.
//!
//! The launcher never sleeps. Every deferred action (the one-shot retry,
//! the pre-navigation delay, the injector interval, toast fades) is a
//! [`Task`] scheduled on a [`TimerQueue`]; the host decides how fast time
//! passes. Tests advance it explicitly, the CLI maps it onto `tokio::time`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::error::ClipboardResult;

/// Handle returned by [`TimerQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Everything the session can defer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Re-run the whole extraction pass once
    Retry,
    /// Hand the URI to the navigator
    Navigate { uri: String },
    /// The asynchronous clipboard write resolved
    ClipboardSettled {
        text: String,
        with_subject: bool,
        outcome: ClipboardResult<()>,
    },
    /// Periodic trigger revalidation
    Reinject,
    ToastFade { generation: u64 },
    ToastRemove { generation: u64 },
}

impl Task {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::Navigate { .. } => "navigate",
            Self::ClipboardSettled { .. } => "clipboard-settled",
            Self::Reinject => "reinject",
            Self::ToastFade { .. } => "toast-fade",
            Self::ToastRemove { .. } => "toast-remove",
        }
    }
}

/// A task together with the instant it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub id: TaskId,
    pub deadline: Duration,
    pub task: Task,
}

// Min-heap on (deadline, id): ids are handed out in insertion order, so
// equal deadlines fire first-scheduled first.
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.deadline, other.id).cmp(&(self.deadline, self.id))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    heap: BinaryHeap<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from queue creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `task` once, `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.heap.push(Timer {
            id,
            deadline: self.now + delay,
            task,
        });
        id
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|timer| timer.deadline)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its deadline. `None` once nothing else is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<Timer> {
        if self.next_deadline()? > until {
            return None;
        }
        let timer = self.heap.pop()?;
        self.now = self.now.max(timer.deadline);
        Some(timer)
    }

    /// Move the clock forward without firing anything. Never goes back.
    pub fn advance_to(&mut self, instant: Duration) {
        self.now = self.now.max(instant);
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending tasks of the given kind.
    pub fn count(&self, kind: &str) -> usize {
        self.heap.iter().filter(|t| t.task.kind() == kind).count()
    }
}
