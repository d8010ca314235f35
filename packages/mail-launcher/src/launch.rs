//! Clipboard and `mailto:` hand-off.
//!
//! A [`LaunchPayload`] is built once from a normalized [`ExtractionResult`]
//! so the clipboard text and the URI can never disagree. The host
//! environment is reached only through the [`Clipboard`] and [`Navigator`]
//! traits.

use tracing::{debug, warn};

use crate::dom::{Document, NodeId};
use crate::error::{ClipboardError, ClipboardResult, Result};
use crate::locators::OWNED_MARKER;
use crate::types::{ExtractionResult, LaunchPayload};

/// Clipboard capability of the host.
pub trait Clipboard {
    /// Whether the asynchronous write API exists at all.
    fn has_async_write(&self) -> bool;

    /// Start an asynchronous write. The outcome is delivered to the session
    /// on a later tick, never inside the handler that started it.
    fn write_text(&self, text: &str) -> ClipboardResult<()>;

    /// Synchronous copy command over the current selection.
    fn exec_copy(&self, selected: &str) -> ClipboardResult<()>;
}

/// Top-level navigation of the host page.
pub trait Navigator {
    fn navigate(&self, uri: &str) -> Result<()>;
}

/// `Subject: <subject>\n\n<body>` when a subject exists, else the body alone.
pub fn compose_clipboard_text(result: &ExtractionResult, subject_prefix: &str) -> String {
    if result.has_subject() {
        format!("{}{}\n\n{}", subject_prefix, result.subject, result.body)
    } else {
        result.body.clone()
    }
}

/// `mailto:?subject=..&body=..` with both parameters percent-encoded.
pub fn build_mailto(subject: &str, body: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

/// Whether mail clients are likely to truncate `uri`.
pub fn mailto_is_long(uri: &str, warn_chars: usize) -> bool {
    uri.len() > warn_chars
}

impl LaunchPayload {
    pub fn from_result(result: &ExtractionResult, subject_prefix: &str) -> Self {
        Self {
            clipboard_text: compose_clipboard_text(result, subject_prefix),
            mailto_uri: build_mailto(&result.subject, &result.body),
        }
    }

    /// Nothing worth copying or sending.
    pub fn is_blank(&self) -> bool {
        self.clipboard_text.trim().is_empty()
    }

    /// Inverse of [`build_mailto`]: the decoded `(subject, body)` pair.
    pub fn decode_mailto(&self) -> Option<(String, String)> {
        let query = self.mailto_uri.strip_prefix("mailto:?")?;
        let mut subject = None;
        let mut body = None;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=')?;
            let decoded = urlencoding::decode(value).ok()?.into_owned();
            match key {
                "subject" => subject = Some(decoded),
                "body" => body = Some(decoded),
                _ => {}
            }
        }
        Some((subject?, body?))
    }
}

/// Copy `text` through a transient off-screen textarea: select all, run the
/// copy command, remove the element. The element is gone whatever the
/// outcome.
pub fn fallback_copy<C: Clipboard + ?Sized>(
    doc: &mut Document,
    clipboard: &C,
    text: &str,
) -> ClipboardResult<()> {
    let area = create_offscreen_area(doc, text);
    doc.select_contents(area);
    let selected = doc.selected_text().unwrap_or_default();
    let outcome = clipboard.exec_copy(&selected);
    doc.clear_selection();
    doc.remove(area);

    match &outcome {
        Ok(()) => debug!(chars = selected.chars().count(), "fallback copy succeeded"),
        Err(e) => warn!(error = %e, "fallback copy failed"),
    }
    outcome
}

fn create_offscreen_area(doc: &mut Document, text: &str) -> NodeId {
    let area = doc.create_element("textarea");
    doc.set_attr(area, OWNED_MARKER, "copy");
    doc.set_attr(area, "style", "position:fixed;top:0;left:0;opacity:0;");
    doc.set_attr(area, "aria-hidden", "true");
    doc.set_value(area, text);
    let parent = doc.body().unwrap_or_else(|| doc.root());
    doc.append_child(parent, area);
    area
}

/// Start the primary write, or report why it could not start.
pub fn start_async_write<C: Clipboard + ?Sized>(clipboard: &C, text: &str) -> ClipboardResult<()> {
    if !clipboard.has_async_write() {
        return Err(ClipboardError::Unavailable);
    }
    clipboard.write_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClipboard;

    fn result(subject: &str, body: &str) -> ExtractionResult {
        ExtractionResult {
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_compose_with_and_without_subject() {
        assert_eq!(
            compose_clipboard_text(&result("Hi", "Body"), "Subject: "),
            "Subject: Hi\n\nBody"
        );
        assert_eq!(compose_clipboard_text(&result("", "Body"), "Subject: "), "Body");
    }

    #[test]
    fn test_mailto_encodes_reserved_characters() {
        let uri = build_mailto("a&b=c", "line 1\nline 2?");
        assert_eq!(
            uri,
            "mailto:?subject=a%26b%3Dc&body=line%201%0Aline%202%3F"
        );
    }

    #[test]
    fn test_payload_decodes_back_to_result() {
        let original = result("Réunion: 10h & café", "Bonjour,\n\nÀ bientôt + merci");
        let payload = LaunchPayload::from_result(&original, "Subject: ");
        let (subject, body) = payload.decode_mailto().unwrap();
        assert_eq!(subject, original.subject);
        assert_eq!(body, original.body);
    }

    #[test]
    fn test_long_mailto_flagged() {
        let payload = LaunchPayload::from_result(&result("s", &"word ".repeat(600)), "");
        assert!(mailto_is_long(&payload.mailto_uri, 1800));
        assert!(!mailto_is_long("mailto:?subject=&body=", 1800));
    }

    #[test]
    fn test_fallback_copy_cleans_up() {
        let mut doc = Document::new();
        let clipboard = MockClipboard::new();
        let before = doc.descendants(doc.root()).len();

        fallback_copy(&mut doc, &clipboard, "copied text").unwrap();

        assert_eq!(clipboard.exec_copies(), vec!["copied text".to_string()]);
        assert_eq!(doc.descendants(doc.root()).len(), before);
        assert_eq!(doc.selected_text(), None);
    }

    #[test]
    fn test_fallback_copy_failure_still_cleans_up() {
        let mut doc = Document::new();
        let clipboard = MockClipboard::new().fail_exec_copy();
        let before = doc.descendants(doc.root()).len();

        assert!(fallback_copy(&mut doc, &clipboard, "x").is_err());
        assert_eq!(doc.descendants(doc.root()).len(), before);
    }

    #[test]
    fn test_async_write_unavailable() {
        let clipboard = MockClipboard::without_async_write();
        assert_eq!(
            start_async_write(&clipboard, "x"),
            Err(ClipboardError::Unavailable)
        );
        assert!(clipboard.writes().is_empty());
    }
}
