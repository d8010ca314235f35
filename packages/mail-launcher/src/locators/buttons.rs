//! Recovery path for pages that hide the real fields behind custom "copy"
//! buttons. Consulted only when the direct locators produced no text.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::dom::{Document, NodeId};

use super::{is_editable_region, LocatorContext};

lazy_static! {
    static ref SUBJECT_BUTTON: Regex = Regex::new(r"(?i)\b(Objet|Subject)\b").unwrap();
    static ref BODY_BUTTON: Regex = Regex::new(r"(?i)(Copier\s+Corps|Copy\s+Body)").unwrap();
    static ref SEARCH_PLACEHOLDER: Regex = Regex::new(r"(?i)rechercher|search").unwrap();
}

/// First button, in document order, whose text matches `pattern`.
fn find_button(doc: &Document, ctx: &LocatorContext<'_>, pattern: &Regex) -> Option<NodeId> {
    doc.elements_by_tag("button")
        .into_iter()
        .find(|&node| !ctx.is_own(doc, node) && pattern.is_match(&doc.text_content(node)))
}

/// `input[type=text]`, `input:not([type])`, `input[placeholder]` or `textarea`.
fn is_walk_field(doc: &Document, node: NodeId) -> bool {
    if doc.is_tag(node, "textarea") {
        return true;
    }
    doc.is_tag(node, "input")
        && (matches!(doc.input_type(node).as_deref(), None | Some("text"))
            || doc.has_attr(node, "placeholder"))
}

/// Subject text found near a button labelled "Objet" / "Subject".
///
/// Walks up to `proximity_walk_depth` levels, moving to the previous
/// sibling or else the parent, and returns the first trimmed non-empty
/// field value beneath the current level. Falls back to the only short
/// non-search text input on the page, if there is exactly one.
pub fn subject_via_buttons(doc: &Document, ctx: &LocatorContext<'_>) -> Option<String> {
    let button = find_button(doc, ctx, &SUBJECT_BUTTON)?;

    let mut cursor = Some(button);
    for _ in 0..ctx.limits.proximity_walk_depth {
        let Some(level) = cursor else { break };
        let hit = doc
            .descendant_elements(level)
            .into_iter()
            .filter(|&node| is_walk_field(doc, node) && !ctx.is_own(doc, node))
            .find_map(|node| {
                let value = doc.value(node)?.trim();
                (!value.is_empty()).then(|| value.to_string())
            });
        if hit.is_some() {
            debug!(button = ?button, "subject found near copy button");
            return hit;
        }
        cursor = doc
            .previous_element_sibling(level)
            .or_else(|| doc.parent(level));
    }

    let max = ctx.limits.proximity_value_max_chars;
    let mut filled = doc.elements_by_tag("input").into_iter().filter(|&node| {
        matches!(doc.input_type(node).as_deref(), None | Some("text"))
            && !ctx.is_own(doc, node)
            && doc.value(node).is_some_and(|v| {
                !v.trim().is_empty() && v.chars().count() < max
            })
            && !doc
                .attr(node, "placeholder")
                .is_some_and(|p| SEARCH_PLACEHOLDER.is_match(p))
    });

    match (filled.next(), filled.next()) {
        (Some(only), None) => {
            debug!(node = ?only, "subject taken from the only filled text input");
            doc.value(only).map(|v| v.trim().to_string())
        }
        _ => None,
    }
}

/// Body text found next to a "Copier Corps" / "Copy Body" button: the
/// richest editable region under the button's parent.
pub fn body_via_buttons(doc: &Document, ctx: &LocatorContext<'_>) -> Option<String> {
    let button = find_button(doc, ctx, &BODY_BUTTON)?;
    let scope = doc.parent(button).unwrap_or_else(|| doc.root());

    let mut richest: Option<String> = None;
    for node in doc.descendant_elements(scope) {
        if !is_editable_region(doc, node) || ctx.is_own(doc, node) {
            continue;
        }
        let text = doc.field_text(node).trim().to_string();
        let longer = richest
            .as_ref()
            .map_or(true, |best| text.chars().count() > best.chars().count());
        if !text.is_empty() && longer {
            richest = Some(text);
        }
    }
    if richest.is_some() {
        debug!(button = ?button, "body found near copy button");
    }
    richest
}
