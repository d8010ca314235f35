//! The launcher as it lives on one page.
//!
//! A [`LauncherSession`] owns the document, the host capabilities and every
//! piece of state that would otherwise be page globals: the trigger record,
//! the retry machine, the timer queue and the toast. All deferred work goes
//! through the timer queue, so the host (or a test) decides when time
//! passes.
//!
//! # Lifecycle
//!
//! 1. [`LauncherSession::start`] injects the trigger and arms the
//!    re-injection interval.
//! 2. [`LauncherSession::click`] / [`LauncherSession::activate`] run an
//!    extraction pass and, depending on the retry machine, hand off,
//!    schedule the one retry, or report "no content".
//! 3. [`LauncherSession::advance`] fires whatever timers fall due.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::config::LauncherConfig;
use crate::dom::{Document, NodeId};
use crate::error::{ClipboardError, ClipboardResult, LauncherError, Result};
use crate::injector::{ensure_trigger, InjectOutcome, TriggerState};
use crate::launch::{fallback_copy, mailto_is_long, start_async_write, Clipboard, Navigator};
use crate::pipeline::{extract, Extraction};
use crate::retry::{RetryCommand, RetryEvent, RetryMachine, RetryState};
use crate::scheduler::{Task, Timer, TimerQueue};
use crate::toast::Toaster;
use crate::types::{ExtractionResult, LaunchPayload};

/// Which copy path put text on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    AsyncWrite,
    Fallback,
}

/// Observable log of what the session did, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Injected(InjectOutcome),
    Activated,
    /// Activation absorbed by a retry that was already pending
    ActivationCoalesced,
    PassCompleted {
        retry: bool,
        extraction: Extraction,
    },
    RetryScheduled {
        delay: Duration,
    },
    NoContent,
    /// Composed clipboard text was blank; nothing copied or sent
    NothingToSend,
    ClipboardWriteStarted,
    ClipboardFallback {
        reason: ClipboardError,
    },
    Copied {
        via: CopyPath,
        text: String,
    },
    /// The fallback copy failed too; logged and swallowed
    CopyFailed {
        error: ClipboardError,
    },
    ToastShown {
        message: String,
    },
    NavigationScheduled {
        uri: String,
        long: bool,
    },
    Navigated {
        uri: String,
    },
    /// An error or panic escaped a handler and was suppressed
    HandlerFailed {
        context: &'static str,
        reason: String,
    },
}

pub struct LauncherSession<C: Clipboard, N: Navigator> {
    doc: Document,
    config: LauncherConfig,
    clipboard: C,
    navigator: N,
    trigger: Option<TriggerState>,
    retry: RetryMachine,
    timers: TimerQueue,
    toaster: Toaster,
    events: Vec<SessionEvent>,
    started: bool,
}

impl<C: Clipboard, N: Navigator> LauncherSession<C, N> {
    /// Create a session over `doc`. The config is validated up front.
    pub fn new(doc: Document, config: LauncherConfig, clipboard: C, navigator: N) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            retry: RetryMachine::new(config.timing.retry_delay()),
            doc,
            config,
            clipboard,
            navigator,
            trigger: None,
            timers: TimerQueue::new(),
            toaster: Toaster::new(),
            events: Vec::new(),
            started: false,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for simulating host-page changes between ticks.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn trigger_state(&self) -> Option<&TriggerState> {
        self.trigger.as_ref()
    }

    pub fn retry_state(&self) -> RetryState {
        self.retry.state()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Pending timers of one kind (see [`Task::kind`]).
    pub fn pending(&self, kind: &str) -> usize {
        self.timers.count(kind)
    }

    /// Nothing pending except the recurring re-injection.
    pub fn is_idle(&self) -> bool {
        self.timers.len() == self.timers.count("reinject")
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Page-ready: inject the trigger and arm the re-injection interval.
    /// Calling it again is a no-op.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.guarded("inject", Self::reinject);
    }

    /// Route a click on `node`. Returns whether it hit the trigger.
    pub fn click(&mut self, node: NodeId) -> bool {
        let trigger = self
            .trigger
            .as_ref()
            .map(|state| state.trigger)
            .or_else(|| self.doc.get_element_by_id(&self.config.ids.trigger));
        let hit = trigger.is_some_and(|t| node == t || self.doc.contains(t, node));
        if hit {
            self.activate();
        } else {
            trace!(node = ?node, "click outside trigger");
        }
        hit
    }

    /// The trigger was activated.
    pub fn activate(&mut self) {
        self.guarded("activate", |session| {
            session.record(SessionEvent::Activated);
            match session.retry.decide(&RetryEvent::Activated) {
                Some(RetryCommand::RunPass) => session.run_pass(false),
                Some(RetryCommand::Ignore) => {
                    debug!("activation coalesced into pending retry");
                    session.record(SessionEvent::ActivationCoalesced);
                    Ok(())
                }
                _ => Ok(()),
            }
        });
    }

    /// Let `duration` of virtual time pass, firing due timers in order.
    pub fn advance(&mut self, duration: Duration) {
        let until = self.timers.now() + duration;
        while let Some(timer) = self.timers.pop_due(until) {
            self.fire(timer);
        }
        self.timers.advance_to(until);
    }

    /// Fire timers until only the recurring re-injection is left, or until
    /// `limit` of virtual time has passed. Returns the time spent.
    pub fn run_until_idle(&mut self, limit: Duration) -> Duration {
        let start = self.timers.now();
        let until = start + limit;
        while !self.is_idle() {
            let Some(timer) = self.timers.pop_due(until) else {
                break;
            };
            self.fire(timer);
        }
        self.timers.now() - start
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    fn fire(&mut self, timer: Timer) {
        trace!(task = timer.task.kind(), at = ?timer.deadline, "timer fired");
        let context = timer.task.kind();
        self.guarded(context, move |session| session.dispatch(timer.task));
    }

    fn dispatch(&mut self, task: Task) -> Result<()> {
        match task {
            Task::Retry => self.run_pass(true),
            Task::Navigate { uri } => {
                self.navigator.navigate(&uri)?;
                info!(chars = uri.len(), "mailto navigation");
                self.record(SessionEvent::Navigated { uri });
                Ok(())
            }
            Task::ClipboardSettled {
                text,
                with_subject,
                outcome,
            } => {
                self.clipboard_settled(text, with_subject, outcome);
                Ok(())
            }
            Task::Reinject => self.reinject(),
            Task::ToastFade { generation } => {
                self.toaster.fade(&mut self.doc, generation);
                Ok(())
            }
            Task::ToastRemove { generation } => {
                if self.toaster.remove(&mut self.doc, generation) {
                    if let Some(state) = self.trigger.as_mut() {
                        state.toast = None;
                    }
                }
                Ok(())
            }
        }
    }

    fn reinject(&mut self) -> Result<()> {
        // Re-arm first so a failed run does not stop the interval
        self.timers
            .schedule(self.config.timing.reinject_interval(), Task::Reinject);
        let now = self.timers.now();
        let outcome = ensure_trigger(&mut self.doc, &self.config, &mut self.trigger, now)?;
        if outcome != InjectOutcome::Present {
            self.record(SessionEvent::Injected(outcome));
        }
        Ok(())
    }

    fn run_pass(&mut self, retry: bool) -> Result<()> {
        let extraction = extract(&self.doc, &self.config);
        let empty = extraction.is_empty();
        let result = extraction.result.clone();
        self.record(SessionEvent::PassCompleted { retry, extraction });

        match self.retry.decide(&RetryEvent::PassCompleted { retry, empty }) {
            Some(RetryCommand::ScheduleRetry { delay }) => {
                debug!(?delay, "nothing found; retry scheduled");
                self.timers.schedule(delay, Task::Retry);
                self.record(SessionEvent::RetryScheduled { delay });
                Ok(())
            }
            Some(RetryCommand::Proceed) => self.proceed(&result),
            Some(RetryCommand::NotifyNoContent) => {
                info!("no content found after retry");
                self.record(SessionEvent::NoContent);
                let message = self.config.labels.no_content.clone();
                self.show_toast(&message);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Copy, then schedule navigation. Both come from one payload.
    fn proceed(&mut self, result: &ExtractionResult) -> Result<()> {
        let payload = LaunchPayload::from_result(result, &self.config.labels.subject_prefix);
        if payload.is_blank() {
            self.record(SessionEvent::NothingToSend);
            return Ok(());
        }
        let with_subject = result.has_subject();

        match start_async_write(&self.clipboard, &payload.clipboard_text) {
            Err(ClipboardError::Unavailable) => {
                self.record(SessionEvent::ClipboardFallback {
                    reason: ClipboardError::Unavailable,
                });
                self.copy_with_fallback(&payload.clipboard_text, with_subject);
            }
            outcome => {
                self.record(SessionEvent::ClipboardWriteStarted);
                self.timers.schedule(
                    Duration::ZERO,
                    Task::ClipboardSettled {
                        text: payload.clipboard_text.clone(),
                        with_subject,
                        outcome,
                    },
                );
            }
        }

        let long = mailto_is_long(&payload.mailto_uri, self.config.limits.mailto_warn_chars);
        if long {
            warn!(
                chars = payload.mailto_uri.len(),
                limit = self.config.limits.mailto_warn_chars,
                "mailto URI is long; mail client may truncate it"
            );
        }
        self.timers.schedule(
            self.config.timing.navigate_delay(),
            Task::Navigate {
                uri: payload.mailto_uri.clone(),
            },
        );
        self.record(SessionEvent::NavigationScheduled {
            uri: payload.mailto_uri,
            long,
        });
        Ok(())
    }

    fn clipboard_settled(&mut self, text: String, with_subject: bool, outcome: ClipboardResult<()>) {
        match outcome {
            Ok(()) => {
                self.record(SessionEvent::Copied {
                    via: CopyPath::AsyncWrite,
                    text,
                });
                self.copied_toast(with_subject);
            }
            Err(reason) => {
                warn!(error = %reason, "clipboard write rejected; using fallback copy");
                self.record(SessionEvent::ClipboardFallback { reason });
                self.copy_with_fallback(&text, with_subject);
            }
        }
    }

    fn copy_with_fallback(&mut self, text: &str, with_subject: bool) {
        match fallback_copy(&mut self.doc, &self.clipboard, text) {
            Ok(()) => {
                self.record(SessionEvent::Copied {
                    via: CopyPath::Fallback,
                    text: text.to_string(),
                });
                self.copied_toast(with_subject);
            }
            Err(error) => self.record(SessionEvent::CopyFailed { error }),
        }
    }

    fn copied_toast(&mut self, with_subject: bool) {
        let message = if with_subject {
            self.config.labels.copied_with_subject.clone()
        } else {
            self.config.labels.copied.clone()
        };
        self.show_toast(&message);
    }

    fn show_toast(&mut self, message: &str) {
        let Some(generation) = self.toaster.show(&mut self.doc, &self.config.ids, message) else {
            debug!(message, "no trigger to anchor toast on");
            return;
        };
        if let (Some(state), Some(toast)) = (self.trigger.as_mut(), self.toaster.current()) {
            state.toast = Some(toast.node);
        }
        self.timers
            .schedule(self.config.timing.toast_fade(), Task::ToastFade { generation });
        self.timers
            .schedule(self.config.timing.toast_remove(), Task::ToastRemove { generation });
        self.record(SessionEvent::ToastShown {
            message: message.to_string(),
        });
    }

    /// Run `handler`, converting an error or panic into a logged
    /// [`SessionEvent::HandlerFailed`]. Nothing escapes to the host page.
    fn guarded<F>(&mut self, context: &'static str, handler: F)
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let reason = match catch_unwind(AssertUnwindSafe(|| handler(self))) {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(panic) => LauncherError::Panicked(panic_message(panic.as_ref())).to_string(),
        };
        error!(context, reason = %reason, "launcher handler failed");
        self.record(SessionEvent::HandlerFailed { context, reason });
    }

    fn record(&mut self, event: SessionEvent) {
        trace!(?event, "session event");
        self.events.push(event);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
