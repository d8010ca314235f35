//! Email Launcher Core
//!
//! Harvests an email subject and body from whatever form fields or rich-text
//! editor a third-party page happens to expose, normalizes them, puts them on
//! the clipboard and hands them to the mail client through a `mailto:` URI.
//!
//! # Design Philosophy
//!
//! **"Degrade predictably"**
//!
//! - No contract with the host page: every lookup is a heuristic
//! - Heuristics are ordered strategy lists, not nested conditionals
//! - A miss is `None`, never an error; the worst case is a no-op click
//! - Time is a virtual clock, so every deferred step is testable
//!
//! # Usage
//!
//! ```rust,ignore
//! use mail_launcher::{Document, LauncherConfig, LauncherSession};
//! use mail_launcher::testing::{MockClipboard, MockNavigator};
//!
//! let doc = Document::parse_html(&html);
//! let mut session = LauncherSession::new(
//!     doc,
//!     LauncherConfig::default(),
//!     MockClipboard::new(),
//!     MockNavigator::new(),
//! )?;
//! session.start();
//! session.activate();
//! session.run_until_idle(Duration::from_secs(5));
//! ```
//!
//! # Modules
//!
//! - [`dom`] - Arena document model and HTML snapshot parsing
//! - [`locators`] - Subject/body strategy chains and copy-button recovery
//! - [`normalize`] - Whitespace and length rules, subject derivation
//! - [`pipeline`] - One extraction pass
//! - [`retry`] - One-shot retry state machine
//! - [`scheduler`] - Virtual-clock timer queue
//! - [`launch`] - Clipboard/mailto hand-off and host capability traits
//! - [`injector`] / [`toast`] - Produced DOM: trigger and confirmation bubble
//! - [`session`] - Everything above wired together for one page
//! - [`variables`] - `<<Name>>` token contract shared with templates
//! - [`testing`] - Mock host capabilities

pub mod config;
pub mod dom;
pub mod error;
pub mod injector;
pub mod launch;
pub mod locators;
pub mod normalize;
pub mod pipeline;
pub mod retry;
pub mod scheduler;
pub mod session;
pub mod testing;
pub mod toast;
pub mod types;
pub mod variables;

// Re-export core types at crate root
pub use config::{Labels, LauncherConfig, Limits, ReservedIds, Timing};
pub use dom::{Document, NodeId, Rect, Viewport};
pub use error::{ClipboardError, ConfigError, LauncherError, Result};
pub use types::{ExtractionResult, FieldCandidate, LaunchPayload, Provenance, StrategyTag};

pub use injector::{ensure_trigger, InjectOutcome, TriggerState};
pub use launch::{build_mailto, compose_clipboard_text, mailto_is_long, Clipboard, Navigator};
pub use locators::{locate_body, locate_subject, LocatorContext, OWNED_MARKER};
pub use normalize::{derive_subject, normalize_body, normalize_subject};
pub use pipeline::{extract, Extraction};
pub use retry::{RetryCommand, RetryEvent, RetryMachine, RetryState};
pub use scheduler::{Task, TaskId, TimerQueue};
pub use session::{CopyPath, LauncherSession, SessionEvent};
pub use toast::Toaster;
pub use variables::{detect_variables, find_primary_editor, insert_at_cursor, Template};
