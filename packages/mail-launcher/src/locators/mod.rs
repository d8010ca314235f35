//! Ordered locator strategy chains.
//!
//! Each strategy is a plain function from the document to an optional node.
//! Chains are evaluated in fixed priority order and stop at the first hit,
//! so strategies can be tested and reordered independently.

pub mod body;
pub mod buttons;
pub mod subject;

use tracing::{debug, trace};

use crate::config::Limits;
use crate::dom::{Document, NodeId};
use crate::types::{FieldCandidate, StrategyTag};

pub use body::{locate_body, BODY_STRATEGIES, BODY_MARKERS, RICH_EDITOR_SIGNATURES};
pub use buttons::{body_via_buttons, subject_via_buttons};
pub use subject::{locate_subject, SUBJECT_STRATEGIES, SUBJECT_TOKENS};

/// Attribute stamped on every element this system injects. Such elements
/// are never candidates.
pub const OWNED_MARKER: &str = "data-email-launcher";

/// Inputs a strategy needs besides the document.
#[derive(Debug, Clone, Copy)]
pub struct LocatorContext<'a> {
    pub limits: &'a Limits,
}

impl<'a> LocatorContext<'a> {
    pub fn new(limits: &'a Limits) -> Self {
        Self { limits }
    }

    /// Whether `node` belongs to the launcher's own injected UI.
    pub fn is_own(&self, doc: &Document, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if doc.has_attr(current, OWNED_MARKER) {
                return true;
            }
            cursor = doc.parent(current);
        }
        false
    }
}

/// Signature shared by all locator strategies.
pub type LocateFn = fn(&Document, &LocatorContext<'_>) -> Option<NodeId>;

/// One named heuristic.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub tag: StrategyTag,
    pub name: &'static str,
    pub locate: LocateFn,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .finish()
    }
}

impl Strategy {
    pub fn run(&self, doc: &Document, ctx: &LocatorContext<'_>) -> Option<FieldCandidate> {
        (self.locate)(doc, ctx).map(|node| FieldCandidate::new(node, self.tag))
    }
}

/// Evaluate `chain` in order, returning the first hit.
pub fn run_chain(
    chain: &[Strategy],
    doc: &Document,
    ctx: &LocatorContext<'_>,
) -> Option<FieldCandidate> {
    for strategy in chain {
        match strategy.run(doc, ctx) {
            Some(candidate) => {
                debug!(strategy = strategy.name, node = ?candidate.node, "locator hit");
                return Some(candidate);
            }
            None => trace!(strategy = strategy.name, "locator miss"),
        }
    }
    None
}

/// Matches `textarea, [contenteditable="true"], [contenteditable=""], div[role=textbox]`.
pub(crate) fn is_editable_region(doc: &Document, node: NodeId) -> bool {
    if doc.is_tag(node, "textarea") {
        return true;
    }
    if let Some(flag) = doc.attr(node, "contenteditable") {
        let flag = flag.trim();
        if flag.is_empty() || flag.eq_ignore_ascii_case("true") {
            return true;
        }
    }
    doc.is_tag(node, "div")
        && doc
            .attr(node, "role")
            .is_some_and(|r| r.eq_ignore_ascii_case("textbox"))
}
