//! Data model shared by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dom::NodeId;

/// Which heuristic selected a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyTag {
    /// Subject input matched by `name`/`id`/`placeholder`
    Attribute,
    /// Subject input resolved through a `<label>`
    Label,
    /// First visible short text input with a value
    GenericFallback,
    /// Body node carrying an explicit body marker attribute
    ExplicitMarker,
    /// Body node matching a known rich-editor signature
    RichEditor,
    /// Editable region with the longest text
    LargestEditable,
    /// Text inferred from elements near a "copy" button
    ButtonProximity,
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attribute => "attribute",
            Self::Label => "label",
            Self::GenericFallback => "generic-fallback",
            Self::ExplicitMarker => "explicit-marker",
            Self::RichEditor => "rich-editor",
            Self::LargestEditable => "largest-editable",
            Self::ButtonProximity => "button-proximity",
        };
        f.write_str(name)
    }
}

/// A node picked by a locator strategy.
///
/// Only meaningful for the pass that produced it: the host page may remove
/// or replace the node before the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCandidate {
    pub node: NodeId,
    pub strategy: StrategyTag,
}

impl FieldCandidate {
    pub fn new(node: NodeId, strategy: StrategyTag) -> Self {
        Self { node, strategy }
    }
}

/// Normalized subject and body from one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub subject: String,
    pub body: String,
}

impl ExtractionResult {
    /// Both sides empty: nothing worth launching.
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty() && self.body.is_empty()
    }

    pub fn has_subject(&self) -> bool {
        !self.subject.is_empty()
    }
}

/// Where each side of an [`ExtractionResult`] came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// `None` when no subject source was found or the subject was derived
    pub subject: Option<StrategyTag>,
    pub body: Option<StrategyTag>,
    /// Subject synthesized from the body's first line
    pub derived_subject: bool,
}

/// Everything the launcher hands to the host, built from one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchPayload {
    pub clipboard_text: String,
    pub mailto_uri: String,
}
