//! Persistent trigger injection.
//!
//! Host pages re-render and may drop the trigger at any time. The injector
//! runs on page-ready and again on a fixed interval; each run either finds
//! the reserved elements or creates exactly one of each.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::LauncherConfig;
use crate::dom::{Document, NodeId, Rect};
use crate::error::{LauncherError, Result};
use crate::locators::OWNED_MARKER;

const WRAPPER_LEFT: f32 = 14.0;
const WRAPPER_BOTTOM: f32 = 18.0;
const TRIGGER_WIDTH: f32 = 136.0;
const TRIGGER_HEIGHT: f32 = 38.0;

const WRAPPER_STYLE: &str = "position:fixed;left:14px;bottom:18px;z-index:2147483600;";
const TRIGGER_STYLE: &str = "padding:10px 18px;font-size:13px;font-weight:600;\
border-radius:18px;cursor:pointer;display:inline-flex;align-items:center;gap:6px;";

/// What one injector run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// First injection on this page
    Created,
    /// The host page dropped the trigger and it was put back
    Reinjected,
    /// Trigger already present; nothing changed
    Present,
}

/// Lifetime record of the injected trigger. Created on the first injection,
/// revalidated on every interval, never torn down.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerState {
    pub trigger: NodeId,
    pub wrapper: NodeId,
    pub toast: Option<NodeId>,
    pub created_at: Duration,
    pub last_validated: Duration,
    pub reinjections: u32,
}

impl TriggerState {
    /// Whether the recorded trigger is still in the document.
    pub fn is_attached(&self, doc: &Document) -> bool {
        doc.is_connected(self.trigger)
    }
}

/// Make sure the wrapper and the trigger exist. Idempotent.
pub fn ensure_trigger(
    doc: &mut Document,
    config: &LauncherConfig,
    state: &mut Option<TriggerState>,
    now: Duration,
) -> Result<InjectOutcome> {
    let body = doc.body().ok_or(LauncherError::MissingBody)?;

    let mut created = false;
    let wrapper = match doc.get_element_by_id(&config.ids.wrapper) {
        Some(existing) => existing,
        None => {
            created = true;
            create_wrapper(doc, body, config)
        }
    };
    let trigger = match doc.get_element_by_id(&config.ids.trigger) {
        Some(existing) => existing,
        None => {
            created = true;
            create_trigger(doc, wrapper, config)
        }
    };

    let Some(existing) = state.as_mut() else {
        *state = Some(TriggerState {
            trigger,
            wrapper,
            toast: None,
            created_at: now,
            last_validated: now,
            reinjections: 0,
        });
        info!(trigger = ?trigger, "trigger injected");
        return Ok(InjectOutcome::Created);
    };

    existing.trigger = trigger;
    existing.wrapper = wrapper;
    existing.last_validated = now;
    if !created {
        return Ok(InjectOutcome::Present);
    }
    existing.reinjections += 1;
    debug!(reinjections = existing.reinjections, "trigger re-injected");
    Ok(InjectOutcome::Reinjected)
}

fn create_wrapper(doc: &mut Document, body: NodeId, config: &LauncherConfig) -> NodeId {
    let wrapper = doc.create_element("div");
    doc.set_attr(wrapper, "id", config.ids.wrapper.as_str());
    doc.set_attr(wrapper, OWNED_MARKER, "wrapper");
    doc.set_attr(wrapper, "style", WRAPPER_STYLE);
    doc.set_rect(wrapper, trigger_rect(doc));
    doc.append_child(body, wrapper);
    wrapper
}

fn create_trigger(doc: &mut Document, wrapper: NodeId, config: &LauncherConfig) -> NodeId {
    let button = doc.create_element("button");
    doc.set_attr(button, "id", config.ids.trigger.as_str());
    doc.set_attr(button, "type", "button");
    doc.set_attr(button, OWNED_MARKER, "trigger");
    doc.set_attr(button, "title", config.labels.trigger_title.as_str());
    doc.set_attr(button, "style", TRIGGER_STYLE);
    let label = doc.create_text(config.labels.trigger_text.as_str());
    doc.append_child(button, label);
    doc.set_rect(button, trigger_rect(doc));
    doc.append_child(wrapper, button);
    button
}

/// Bottom-left corner of the viewport.
fn trigger_rect(doc: &Document) -> Rect {
    let viewport = doc.viewport();
    Rect::new(
        WRAPPER_LEFT,
        viewport.height - WRAPPER_BOTTOM - TRIGGER_HEIGHT,
        TRIGGER_WIDTH,
        TRIGGER_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_id(doc: &Document, id: &str) -> usize {
        doc.elements()
            .into_iter()
            .filter(|&n| doc.attr(n, "id") == Some(id))
            .count()
    }

    #[test]
    fn test_first_run_creates_once() {
        let mut doc = Document::new();
        let config = LauncherConfig::default();
        let mut state = None;

        let outcome = ensure_trigger(&mut doc, &config, &mut state, Duration::ZERO).unwrap();
        assert_eq!(outcome, InjectOutcome::Created);
        let again = ensure_trigger(&mut doc, &config, &mut state, Duration::from_secs(2)).unwrap();
        assert_eq!(again, InjectOutcome::Present);

        assert_eq!(count_id(&doc, "email-launch-btn"), 1);
        assert_eq!(count_id(&doc, "email-launch-btn-wrap"), 1);

        let state = state.unwrap();
        assert_eq!(state.last_validated, Duration::from_secs(2));
        assert_eq!(state.reinjections, 0);
        assert_eq!(doc.text_content(state.trigger), "New email");
        assert_eq!(doc.parent(state.trigger), Some(state.wrapper));
    }

    #[test]
    fn test_reinjects_after_host_rerender() {
        let mut doc = Document::new();
        let config = LauncherConfig::default();
        let mut state = None;
        ensure_trigger(&mut doc, &config, &mut state, Duration::ZERO).unwrap();

        let wrapper = state.as_ref().unwrap().wrapper;
        doc.remove(wrapper);
        assert!(!state.as_ref().unwrap().is_attached(&doc));

        let outcome = ensure_trigger(&mut doc, &config, &mut state, Duration::from_secs(2)).unwrap();
        assert_eq!(outcome, InjectOutcome::Reinjected);
        let state = state.unwrap();
        assert!(state.is_attached(&doc));
        assert_eq!(state.reinjections, 1);
        assert_eq!(count_id(&doc, "email-launch-btn"), 1);
    }

    #[test]
    fn test_existing_trigger_is_left_alone() {
        let mut doc = Document::parse_html(r#"<button id="email-launch-btn">Host-made</button>"#);
        let config = LauncherConfig::default();
        let mut state = None;
        ensure_trigger(&mut doc, &config, &mut state, Duration::ZERO).unwrap();

        assert_eq!(count_id(&doc, "email-launch-btn"), 1);
        assert_eq!(doc.text_content(state.unwrap().trigger), "Host-made");
    }

    #[test]
    fn test_trigger_sits_bottom_left() {
        let mut doc = Document::new();
        let mut state = None;
        ensure_trigger(&mut doc, &LauncherConfig::default(), &mut state, Duration::ZERO).unwrap();
        let rect = doc.rect(state.unwrap().trigger).unwrap();
        assert_eq!(rect.left(), 14.0);
        assert_eq!(rect.bottom(), 800.0 - 18.0);
    }
}
