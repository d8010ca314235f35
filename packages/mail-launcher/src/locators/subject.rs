//! Subject locator: attribute, then label, then generic fallback.

use crate::dom::{Document, NodeId};
use crate::types::{FieldCandidate, StrategyTag};

use super::{run_chain, LocatorContext, Strategy};

/// Case-insensitive tokens that mark a subject field (French and English).
pub const SUBJECT_TOKENS: &[&str] = &["objet", "subject"];

/// Input types that can never hold a free-text subject.
const NON_TEXT_INPUT_TYPES: &[&str] = &[
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "file",
    "hidden",
    "image",
    "month",
    "radio",
    "range",
    "reset",
    "submit",
    "time",
    "week",
];

/// Subject strategies in priority order.
pub const SUBJECT_STRATEGIES: &[Strategy] = &[
    Strategy {
        tag: StrategyTag::Attribute,
        name: "subject-attribute",
        locate: by_attribute,
    },
    Strategy {
        tag: StrategyTag::Label,
        name: "subject-label",
        locate: by_label,
    },
    Strategy {
        tag: StrategyTag::GenericFallback,
        name: "subject-generic",
        locate: generic_fallback,
    },
];

/// Run the subject chain.
pub fn locate_subject(doc: &Document, ctx: &LocatorContext<'_>) -> Option<FieldCandidate> {
    run_chain(SUBJECT_STRATEGIES, doc, ctx)
}

fn mentions_subject(text: &str) -> bool {
    let lower = text.to_lowercase();
    SUBJECT_TOKENS.iter().any(|token| lower.contains(token))
}

fn is_single_line_input(doc: &Document, node: NodeId) -> bool {
    doc.is_tag(node, "input")
        && !doc
            .input_type(node)
            .is_some_and(|t| NON_TEXT_INPUT_TYPES.contains(&t.as_str()))
}

/// Single-line input whose `name`, `id` or `placeholder` mentions a subject token.
pub fn by_attribute(doc: &Document, ctx: &LocatorContext<'_>) -> Option<NodeId> {
    doc.elements().into_iter().find(|&node| {
        is_single_line_input(doc, node)
            && !ctx.is_own(doc, node)
            && ["name", "id", "placeholder"]
                .iter()
                .filter_map(|attr| doc.attr(node, attr))
                .any(mentions_subject)
    })
}

/// `<label>` mentioning a subject token, resolved through `for`, nesting,
/// or its next sibling.
pub fn by_label(doc: &Document, ctx: &LocatorContext<'_>) -> Option<NodeId> {
    doc.elements_by_tag("label")
        .into_iter()
        .filter(|&label| !ctx.is_own(doc, label) && mentions_subject(&doc.text_content(label)))
        .find_map(|label| resolve_label(doc, label))
}

fn resolve_label(doc: &Document, label: NodeId) -> Option<NodeId> {
    let is_field = |node: NodeId| doc.is_tag(node, "input") || doc.is_tag(node, "textarea");

    if let Some(target) = doc.attr(label, "for").and_then(|id| doc.get_element_by_id(id)) {
        return Some(target);
    }
    if let Some(nested) = doc
        .descendant_elements(label)
        .into_iter()
        .find(|&node| is_field(node))
    {
        return Some(nested);
    }
    doc.next_element_sibling(label).filter(|&next| is_field(next))
}

/// First rendered text/search input already holding a short value.
pub fn generic_fallback(doc: &Document, ctx: &LocatorContext<'_>) -> Option<NodeId> {
    let max = ctx.limits.generic_value_max_chars;
    doc.elements_by_tag("input").into_iter().find(|&node| {
        let text_like = matches!(doc.input_type(node).as_deref(), None | Some("text" | "search"));
        text_like
            && !ctx.is_own(doc, node)
            && doc.offset_width(node) > 0.0
            && doc
                .value(node)
                .is_some_and(|v| !v.is_empty() && v.chars().count() < max)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;

    fn locate(html: &str) -> Option<(String, StrategyTag)> {
        let doc = Document::parse_html(html);
        let limits = Limits::default();
        let ctx = LocatorContext::new(&limits);
        locate_subject(&doc, &ctx).map(|c| {
            (
                doc.attr(c.node, "data-t").unwrap_or_default().to_string(),
                c.strategy,
            )
        })
    }

    #[test]
    fn test_attribute_matches_name_id_placeholder() {
        for html in [
            r#"<input data-t="hit" name="mail_objet">"#,
            r#"<input data-t="hit" id="Subject-Field">"#,
            r#"<input data-t="hit" placeholder="Enter SUBJECT">"#,
        ] {
            assert_eq!(
                locate(html),
                Some(("hit".to_string(), StrategyTag::Attribute)),
                "{html}"
            );
        }
    }

    #[test]
    fn test_attribute_first_in_document_order() {
        let html = r#"<input data-t="first" name="subject"><input data-t="second" id="objet">"#;
        assert_eq!(locate(html).unwrap().0, "first");
    }

    #[test]
    fn test_attribute_skips_non_text_inputs() {
        let html = r#"<input type="checkbox" name="subject_ok"><input data-t="hit" name="subject">"#;
        assert_eq!(locate(html).unwrap().0, "hit");
    }

    #[test]
    fn test_label_for_target() {
        let html = r#"<label for="f1">Objet du message</label><input id="f1" data-t="hit">"#;
        assert_eq!(
            locate(html),
            Some(("hit".to_string(), StrategyTag::Label))
        );
    }

    #[test]
    fn test_label_nested_input() {
        let html = r#"<label>Subject <textarea data-t="hit"></textarea></label>"#;
        assert_eq!(locate(html).unwrap(), ("hit".to_string(), StrategyTag::Label));
    }

    #[test]
    fn test_label_next_sibling() {
        let html = r#"<div><label>Subject</label><input data-t="hit"></div>"#;
        assert_eq!(locate(html).unwrap(), ("hit".to_string(), StrategyTag::Label));
    }

    #[test]
    fn test_unresolvable_label_falls_through_to_next_label() {
        let html = r#"
            <label>Subject</label><span>nope</span>
            <label>Objet<input data-t="hit"></label>"#;
        assert_eq!(locate(html).unwrap(), ("hit".to_string(), StrategyTag::Label));
    }

    #[test]
    fn test_generic_fallback_requires_visible_short_value() {
        let html = format!(
            r#"
            <input type="text" style="display:none" value="hidden">
            <input type="email" value="not text-like">
            <input type="text" value="">
            <input type="text" value="{}">
            <input type="search" data-t="hit" value="Quarterly report">
            "#,
            "x".repeat(250)
        );
        assert_eq!(
            locate(&html),
            Some(("hit".to_string(), StrategyTag::GenericFallback))
        );
    }

    #[test]
    fn test_generic_fallback_length_boundary() {
        let page = |len: usize| format!(r#"<input data-t="hit" name="notes" value="{}">"#, "a".repeat(len));
        assert_eq!(
            locate(&page(199)),
            Some(("hit".to_string(), StrategyTag::GenericFallback))
        );
        assert_eq!(locate(&page(200)), None);
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(locate("<p>hello</p><input type=text>"), None);
    }
}
