//! Transient confirmation bubble anchored on the trigger.

use tracing::trace;

use crate::config::ReservedIds;
use crate::dom::{Document, NodeId, Rect};
use crate::locators::OWNED_MARKER;

/// Gap kept between the bubble and the top of the viewport.
const MIN_TOP: f32 = 8.0;
/// Distance from the anchor's top edge to the bubble's.
const OFFSET_ABOVE: f32 = 44.0;
const OFFSET_BELOW: f32 = 8.0;
const HEIGHT: f32 = 26.0;

const BASE_STYLE: &str = "position:fixed;z-index:2147483601;padding:6px 12px;\
font-size:12px;border-radius:20px;pointer-events:none;transition:opacity .25s,transform .25s;";

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub node: NodeId,
    pub generation: u64,
    pub message: String,
}

/// Owns the single live toast. A newer toast supersedes an older one; timers
/// carry the generation they were scheduled for and go stale when it moves.
#[derive(Debug, Default)]
pub struct Toaster {
    generation: u64,
    current: Option<Toast>,
}

/// Top and horizontal centre for a bubble anchored on `anchor`.
pub fn toast_position(anchor: Rect) -> (f32, f32) {
    let above = anchor.top() - OFFSET_ABOVE;
    let top = if above < MIN_TOP {
        anchor.bottom() + OFFSET_BELOW
    } else {
        above
    };
    (top, anchor.left() + anchor.width / 2.0)
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Show `message` next to the trigger. Returns the new generation, or
    /// `None` when there is no trigger to anchor on.
    pub fn show(&mut self, doc: &mut Document, ids: &ReservedIds, message: &str) -> Option<u64> {
        let anchor = doc.get_element_by_id(&ids.trigger)?;
        let anchor_rect = doc.rect(anchor).unwrap_or_default();

        if let Some(stale) = doc.get_element_by_id(&ids.toast) {
            doc.remove(stale);
        }

        let (top, center) = toast_position(anchor_rect);
        let node = doc.create_element("div");
        doc.set_attr(node, "id", ids.toast.as_str());
        doc.set_attr(node, OWNED_MARKER, "toast");
        doc.set_attr(node, "role", "status");
        doc.set_attr(
            node,
            "style",
            format!(
                "{BASE_STYLE}top:{top}px;left:{center}px;transform:translate(-50%,0);opacity:1;"
            ),
        );
        let text = doc.create_text(message);
        doc.append_child(node, text);
        let width = 24.0 + 7.0 * message.chars().count() as f32;
        doc.set_rect(node, Rect::new(center - width / 2.0, top, width, HEIGHT));

        let parent = doc.body().unwrap_or_else(|| doc.root());
        doc.append_child(parent, node);

        self.generation += 1;
        self.current = Some(Toast {
            node,
            generation: self.generation,
            message: message.to_string(),
        });
        trace!(generation = self.generation, message, "toast shown");
        Some(self.generation)
    }

    /// Start fading the toast of `generation`. Stale generations are ignored.
    pub fn fade(&mut self, doc: &mut Document, generation: u64) -> bool {
        let Some(toast) = self.current.as_ref().filter(|t| t.generation == generation) else {
            return false;
        };
        let style = doc.attr(toast.node, "style").unwrap_or_default().replace(
            "transform:translate(-50%,0);opacity:1;",
            "transform:translate(-50%,-4px);opacity:0;",
        );
        doc.set_attr(toast.node, "style", style);
        true
    }

    /// Remove the toast of `generation`. Stale generations are ignored.
    pub fn remove(&mut self, doc: &mut Document, generation: u64) -> bool {
        match self.current.take() {
            Some(toast) if toast.generation == generation => {
                doc.remove(toast.node);
                true
            }
            other => {
                self.current = other;
                false
            }
        }
    }
}
