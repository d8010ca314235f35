//! Host capabilities backed by the operating system.

use std::cell::RefCell;
use std::io::Write;
use std::process::{Command, Stdio};

use clipboard::{ClipboardContext, ClipboardProvider};
use colored::Colorize;
use mail_launcher::error::{ClipboardError, ClipboardResult};
use mail_launcher::{Clipboard, LauncherError, Navigator};
use tracing::{debug, warn};

/// Copy commands tried for the fallback path, first found wins.
const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// The desktop clipboard.
///
/// The clipboard crate's context plays the asynchronous API; a copy
/// command found on `PATH` plays the synchronous fallback.
///
/// On Linux the clipboard crate serves the X11 selection from this
/// process, so the text is gone once `mail-launch` exits. There the copy
/// command, which keeps serving after we exit, is used whenever one is
/// installed.
pub struct SystemClipboard {
    context: RefCell<Option<ClipboardContext>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        if cfg!(target_os = "linux") && copy_command(on_path).is_some() {
            debug!("Using copy command for the system clipboard");
            return Self {
                context: RefCell::new(None),
            };
        }
        let context = match ClipboardProvider::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                warn!(error = %e, "System clipboard unavailable, copy command only");
                None
            }
        };
        Self {
            context: RefCell::new(context),
        }
    }
}

fn on_path(program: &str) -> bool {
    which::which(program).is_ok()
}

/// First entry of [`COPY_COMMANDS`] that `available` accepts.
fn copy_command(
    available: impl Fn(&str) -> bool,
) -> Option<(&'static str, &'static [&'static str])> {
    COPY_COMMANDS
        .iter()
        .copied()
        .find(|(program, _)| available(*program))
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn has_async_write(&self) -> bool {
        self.context.borrow().is_some()
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        let mut context = self.context.borrow_mut();
        let ctx = context.as_mut().ok_or(ClipboardError::Unavailable)?;
        ctx.set_contents(text.to_string())
            .map_err(|e| ClipboardError::Rejected(e.to_string()))
    }

    fn exec_copy(&self, selected: &str) -> ClipboardResult<()> {
        let (program, args) = copy_command(on_path)
            .ok_or_else(|| ClipboardError::CopyCommand("no copy command on PATH".to_string()))?;
        debug!(program, "Copying through system command");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::CopyCommand(format!("{}: {}", program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(selected.as_bytes())
                .map_err(|e| ClipboardError::CopyCommand(format!("{}: {}", program, e)))?;
        }

        let status = child
            .wait()
            .map_err(|e| ClipboardError::CopyCommand(format!("{}: {}", program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CopyCommand(format!(
                "{} exited with {}",
                program, status
            )))
        }
    }
}

/// Opens the mailto URI with the default handler.
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn navigate(&self, uri: &str) -> mail_launcher::Result<()> {
        open::that(uri).map_err(|e| LauncherError::Navigation(e.to_string()))
    }
}

/// Prints instead of copying.
pub struct EchoClipboard;

impl Clipboard for EchoClipboard {
    fn has_async_write(&self) -> bool {
        true
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        println!("{}", "clipboard ←".bright_blue().bold());
        println!("{}", text);
        Ok(())
    }

    fn exec_copy(&self, selected: &str) -> ClipboardResult<()> {
        self.write_text(selected)
    }
}

/// Prints instead of opening the mail client.
pub struct EchoNavigator;

impl Navigator for EchoNavigator {
    fn navigate(&self, uri: &str) -> mail_launcher::Result<()> {
        println!("{} {}", "open →".bright_blue().bold(), uri);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_command_takes_first_available() {
        let found = copy_command(|program| program == "xclip" || program == "xsel");
        assert_eq!(found, Some(("xclip", &["-selection", "clipboard"][..])));
    }

    #[test]
    fn test_copy_command_prefers_native_tool() {
        let found = copy_command(|_| true).map(|(program, _)| program);
        assert_eq!(found, Some("pbcopy"));
    }

    #[test]
    fn test_no_copy_command() {
        assert_eq!(copy_command(|_| false), None);
        assert!(!SystemClipboard {
            context: RefCell::new(None),
        }
        .has_async_write());
    }
}
