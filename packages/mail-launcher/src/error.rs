//! Typed errors for the launcher library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). A locator that finds
//! nothing is not an error: strategies return `Option` and the chain moves on.
//! An empty extraction is a session outcome, not an error either.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors that can surface while handling a trigger activation.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// A node id did not refer to a live element
    #[error("stale node reference: {0:?}")]
    StaleNode(NodeId),

    /// The document has no `<body>` to attach produced elements to
    #[error("document has no body element")]
    MissingBody,

    /// Clipboard failure that escaped the fallback path
    #[error("clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Navigation to the mailto URI was refused by the host
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A handler panicked; caught at the top level
    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// Errors from the host clipboard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardError {
    /// The asynchronous clipboard API is not exposed by the host
    #[error("clipboard write capability unavailable")]
    Unavailable,

    /// The host rejected the write (permissions, focus, ...)
    #[error("clipboard write rejected: {0}")]
    Rejected(String),

    /// The synchronous copy command reported failure
    #[error("copy command failed: {0}")]
    CopyCommand(String),
}

/// Configuration validation and loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A limit or delay that must be positive was zero
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    /// Derived subjects cannot be longer than explicit ones
    #[error("derived subject limit ({derived}) exceeds subject limit ({subject})")]
    DerivedExceedsSubject { derived: usize, subject: usize },

    /// Reserved element ids must be distinct and non-empty
    #[error("invalid reserved id: {0}")]
    ReservedId(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result type alias for launcher operations.
pub type Result<T> = std::result::Result<T, LauncherError>;

/// Result type alias for clipboard operations.
pub type ClipboardResult<T> = std::result::Result<T, ClipboardError>;

/// Result type alias for configuration.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
