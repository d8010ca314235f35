//! Testing utilities including mock host capabilities.
//!
//! These are useful for driving a [`LauncherSession`] without a browser or
//! an OS clipboard. Mocks share their call log through `Arc`, so a clone
//! kept by the test sees everything the session did with the original.

use std::sync::{Arc, RwLock};

use crate::config::LauncherConfig;
use crate::dom::Document;
use crate::error::{ClipboardError, ClipboardResult, LauncherError, Result};
use crate::launch::{Clipboard, Navigator};
use crate::session::LauncherSession;

/// A mock clipboard for testing.
///
/// Accepts every write by default. Can be told to lack the asynchronous
/// API, to reject asynchronous writes, or to fail the copy command.
#[derive(Clone)]
pub struct MockClipboard {
    async_write: bool,
    reject_writes: bool,
    fail_exec_copy: bool,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockClipboardCall>>>,
}

/// Record of a call made to the mock clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockClipboardCall {
    WriteText { text: String, accepted: bool },
    ExecCopy { selected: String, accepted: bool },
}

impl Default for MockClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClipboard {
    pub fn new() -> Self {
        Self {
            async_write: true,
            reject_writes: false,
            fail_exec_copy: false,
            calls: Arc::default(),
        }
    }

    /// A host without the asynchronous clipboard API.
    pub fn without_async_write() -> Self {
        Self {
            async_write: false,
            ..Self::new()
        }
    }

    /// Reject every asynchronous write.
    pub fn reject_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Make the synchronous copy command fail.
    pub fn fail_exec_copy(mut self) -> Self {
        self.fail_exec_copy = true;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockClipboardCall> {
        self.calls.read().unwrap().clone()
    }

    /// Texts passed to the asynchronous write, accepted or not.
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockClipboardCall::WriteText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Selections passed to the copy command, successful or not.
    pub fn exec_copies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockClipboardCall::ExecCopy { selected, .. } => Some(selected),
                _ => None,
            })
            .collect()
    }

    /// What the clipboard holds: the last accepted text, from either path.
    pub fn contents(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            MockClipboardCall::WriteText {
                text,
                accepted: true,
            } => Some(text),
            MockClipboardCall::ExecCopy {
                selected,
                accepted: true,
            } => Some(selected),
            _ => None,
        })
    }

    /// Number of texts that actually reached the clipboard.
    pub fn successful_copies(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    MockClipboardCall::WriteText { accepted: true, .. }
                        | MockClipboardCall::ExecCopy { accepted: true, .. }
                )
            })
            .count()
    }
}

impl Clipboard for MockClipboard {
    fn has_async_write(&self) -> bool {
        self.async_write
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        let accepted = self.async_write && !self.reject_writes;
        self.calls.write().unwrap().push(MockClipboardCall::WriteText {
            text: text.to_string(),
            accepted,
        });
        if accepted {
            Ok(())
        } else {
            Err(ClipboardError::Rejected("mock rejected write".to_string()))
        }
    }

    fn exec_copy(&self, selected: &str) -> ClipboardResult<()> {
        let accepted = !self.fail_exec_copy;
        self.calls.write().unwrap().push(MockClipboardCall::ExecCopy {
            selected: selected.to_string(),
            accepted,
        });
        if accepted {
            Ok(())
        } else {
            Err(ClipboardError::CopyCommand("mock copy failure".to_string()))
        }
    }
}

/// A mock navigator that records every URI instead of leaving the page.
#[derive(Clone, Default)]
pub struct MockNavigator {
    fail: bool,

    /// Call tracking
    navigations: Arc<RwLock<Vec<String>>>,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every navigation.
    pub fn fail(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.read().unwrap().clone()
    }
}

impl Navigator for MockNavigator {
    fn navigate(&self, uri: &str) -> Result<()> {
        if self.fail {
            return Err(LauncherError::Navigation("mock navigation refused".to_string()));
        }
        self.navigations.write().unwrap().push(uri.to_string());
        Ok(())
    }
}

/// Builder for session-level test scenarios.
pub struct TestScenario {
    html: String,
    config: LauncherConfig,
    clipboard: MockClipboard,
    navigator: MockNavigator,
}

impl TestScenario {
    /// A scenario over an HTML page snapshot.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            config: LauncherConfig::default(),
            clipboard: MockClipboard::new(),
            navigator: MockNavigator::new(),
        }
    }

    pub fn with_config(mut self, config: LauncherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clipboard(mut self, clipboard: MockClipboard) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_navigator(mut self, navigator: MockNavigator) -> Self {
        self.navigator = navigator;
        self
    }

    /// Parse the page, build and start the session.
    ///
    /// Returns handles to the mocks so assertions can run while the session
    /// still owns them.
    pub fn start(self) -> Result<(LauncherSession<MockClipboard, MockNavigator>, MockClipboard, MockNavigator)> {
        let clipboard = self.clipboard.clone();
        let navigator = self.navigator.clone();
        let mut session = LauncherSession::new(
            Document::parse_html(&self.html),
            self.config,
            self.clipboard,
            self.navigator,
        )?;
        session.start();
        Ok((session, clipboard, navigator))
    }
}
