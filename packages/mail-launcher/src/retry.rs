//! One-shot retry state machine.
//!
//! Pure decision logic: the machine sees events, updates its state and
//! answers with at most one command. Running passes, scheduling timers and
//! talking to the clipboard is the session's job.

use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryState {
    #[default]
    Idle,
    /// First pass was empty; one retry is scheduled
    Pending,
    /// The retry ran; no further retries until the next activation
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryEvent {
    /// The user activated the trigger
    Activated,
    /// An extraction pass finished
    PassCompleted { retry: bool, empty: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCommand {
    RunPass,
    ScheduleRetry { delay: Duration },
    Proceed,
    NotifyNoContent,
    /// Activation absorbed by the retry already pending
    Ignore,
}

#[derive(Debug, Clone)]
pub struct RetryMachine {
    state: RetryState,
    delay: Duration,
}

impl RetryMachine {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: RetryState::Idle,
            delay,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Process an event and optionally return a command.
    ///
    /// Events that make no sense in the current state (a retry result with
    /// no retry pending, say) are dropped with `None`.
    pub fn decide(&mut self, event: &RetryEvent) -> Option<RetryCommand> {
        use RetryCommand as Cmd;
        use RetryState::*;

        let command = match (self.state, *event) {
            (Pending, RetryEvent::Activated) => Cmd::Ignore,
            (Idle | Done, RetryEvent::Activated) => {
                self.state = Idle;
                Cmd::RunPass
            }
            (Idle, RetryEvent::PassCompleted { retry: false, empty: false }) => Cmd::Proceed,
            (Idle, RetryEvent::PassCompleted { retry: false, empty: true }) => {
                self.state = Pending;
                Cmd::ScheduleRetry { delay: self.delay }
            }
            (Pending, RetryEvent::PassCompleted { retry: true, empty }) => {
                self.state = Done;
                if empty {
                    Cmd::NotifyNoContent
                } else {
                    Cmd::Proceed
                }
            }
            (state, event) => {
                debug!(?state, ?event, "retry machine ignored event");
                return None;
            }
        };
        Some(command)
    }
}
