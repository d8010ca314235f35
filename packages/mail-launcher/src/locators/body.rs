//! Body locator: explicit marker, then known rich editor, then the largest
//! editable region.

use crate::dom::{Document, NodeId};
use crate::types::{FieldCandidate, StrategyTag};

use super::{is_editable_region, run_chain, LocatorContext, Strategy};

/// Attribute markers a page can set to point at its body field.
/// `(name, None)` means presence alone is enough.
pub const BODY_MARKERS: &[(&str, Option<&str>)] = &[
    ("data-email-body", None),
    ("data-body", None),
    ("data-editor", Some("body")),
    ("data-role", Some("email-body")),
];

/// Container signatures of rich-text editors seen in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSignature {
    Class(&'static str),
    Attribute(&'static str, &'static str),
}

impl EditorSignature {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match *self {
            Self::Class(class) => doc.has_class(node, class),
            Self::Attribute(name, value) => doc.attr(node, name) == Some(value),
        }
    }
}

pub const RICH_EDITOR_SIGNATURES: &[EditorSignature] = &[
    EditorSignature::Class("ProseMirror"),
    EditorSignature::Class("editor-content"),
    EditorSignature::Attribute("data-slate-editor", "true"),
    EditorSignature::Class("ql-editor"),
    EditorSignature::Class("ck-editor__editable"),
];

/// Body strategies in priority order.
pub const BODY_STRATEGIES: &[Strategy] = &[
    Strategy {
        tag: StrategyTag::ExplicitMarker,
        name: "body-marker",
        locate: by_marker,
    },
    Strategy {
        tag: StrategyTag::RichEditor,
        name: "body-rich-editor",
        locate: by_rich_editor,
    },
    Strategy {
        tag: StrategyTag::LargestEditable,
        name: "body-largest-editable",
        locate: largest_editable,
    },
];

/// Run the body chain.
pub fn locate_body(doc: &Document, ctx: &LocatorContext<'_>) -> Option<FieldCandidate> {
    run_chain(BODY_STRATEGIES, doc, ctx)
}

/// First node carrying any body marker.
pub fn by_marker(doc: &Document, ctx: &LocatorContext<'_>) -> Option<NodeId> {
    doc.elements().into_iter().find(|&node| {
        BODY_MARKERS.iter().any(|(name, expected)| match expected {
            Some(expected) => doc.attr(node, name) == Some(*expected),
            None => doc.has_attr(node, name),
        }) && !ctx.is_own(doc, node)
    })
}

/// First node matching a known rich-editor signature.
pub fn by_rich_editor(doc: &Document, ctx: &LocatorContext<'_>) -> Option<NodeId> {
    doc.elements().into_iter().find(|&node| {
        RICH_EDITOR_SIGNATURES.iter().any(|sig| sig.matches(doc, node)) && !ctx.is_own(doc, node)
    })
}

/// Editable region with the longest text; earliest wins ties.
pub fn largest_editable(doc: &Document, ctx: &LocatorContext<'_>) -> Option<NodeId> {
    let mut best: Option<(NodeId, usize)> = None;
    for node in doc.elements() {
        if !is_editable_region(doc, node) || !doc.is_editable(node) || ctx.is_own(doc, node) {
            continue;
        }
        let len = doc.field_text(node).chars().count();
        if best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((node, len));
        }
    }
    best.map(|(node, _)| node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;

    fn locate(html: &str) -> Option<(String, StrategyTag)> {
        let doc = Document::parse_html(html);
        let limits = Limits::default();
        let ctx = LocatorContext::new(&limits);
        locate_body(&doc, &ctx).map(|c| {
            (
                doc.attr(c.node, "data-t").unwrap_or_default().to_string(),
                c.strategy,
            )
        })
    }

    #[test]
    fn test_marker_short_circuits_everything() {
        let html = r#"
            <textarea>a much longer body that would otherwise win the size contest</textarea>
            <div class="ProseMirror" contenteditable="true">rich</div>
            <div data-t="hit" data-role="email-body">tiny</div>"#;
        assert_eq!(
            locate(html),
            Some(("hit".to_string(), StrategyTag::ExplicitMarker))
        );
    }

    #[test]
    fn test_marker_variants() {
        for html in [
            r#"<div data-t="hit" data-email-body></div>"#,
            r#"<div data-t="hit" data-body="x"></div>"#,
            r#"<div data-t="hit" data-editor="body"></div>"#,
        ] {
            assert_eq!(locate(html).unwrap().1, StrategyTag::ExplicitMarker, "{html}");
        }
        // Wrong value is not a marker
        assert_eq!(
            locate(r#"<div data-editor="subject"></div>"#),
            None
        );
    }

    #[test]
    fn test_rich_editor_signatures() {
        for html in [
            r#"<div data-t="hit" class="wrapper ProseMirror"></div>"#,
            r#"<div data-t="hit" data-slate-editor="true"></div>"#,
            r#"<div data-t="hit" class="ql-editor"></div>"#,
        ] {
            assert_eq!(
                locate(html),
                Some(("hit".to_string(), StrategyTag::RichEditor)),
                "{html}"
            );
        }
    }

    #[test]
    fn test_rich_editor_beats_longer_textarea() {
        let long = "A far longer draft sitting in a plain textarea. ".repeat(10);
        for editor in [
            r#"<div data-t="rich" class="ProseMirror" contenteditable="true">Short</div>"#,
            r#"<div data-t="rich" class="ql-editor">Short</div>"#,
        ] {
            let html = format!(r#"<textarea data-t="plain">{}</textarea>{}"#, long, editor);
            assert_eq!(
                locate(&html),
                Some(("rich".to_string(), StrategyTag::RichEditor)),
                "{editor}"
            );
        }
    }

    #[test]
    fn test_largest_editable_by_text_length() {
        let html = r#"
            <textarea data-t="short">hi</textarea>
            <div data-t="long" contenteditable="true"><p>Quite a bit longer</p></div>
            <div data-t="role" role="textbox">mid size</div>"#;
        assert_eq!(
            locate(html),
            Some(("long".to_string(), StrategyTag::LargestEditable))
        );
    }

    #[test]
    fn test_largest_editable_ties_keep_document_order() {
        let html = r#"
            <textarea data-t="first">same</textarea>
            <textarea data-t="second">same</textarea>"#;
        assert_eq!(locate(html).unwrap().0, "first");
    }

    #[test]
    fn test_empty_editable_still_located() {
        assert_eq!(
            locate(r#"<textarea data-t="empty"></textarea>"#),
            Some(("empty".to_string(), StrategyTag::LargestEditable))
        );
    }

    #[test]
    fn test_contenteditable_false_is_not_a_region() {
        assert_eq!(
            locate(r#"<div contenteditable="false">text</div>"#),
            None
        );
    }
}
