//! Building a [`Document`] from an HTML snapshot.
//!
//! Uses the `scraper` crate (html5ever underneath), so malformed markup is
//! recovered rather than rejected. A snapshot has no layout engine behind it;
//! elements get a synthetic box: zero-width when hidden, otherwise the inline
//! `width: Npx` or a default width for their tag.

use scraper::{ElementRef, Html, Node};
use tracing::debug;

use super::document::{Document, NodeId, Rect};

impl Document {
    /// Parse an HTML document snapshot.
    pub fn parse_html(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let root = parsed.root_element();
        let mut doc = Document::with_root(root.value().name());
        let doc_root = doc.root();
        copy_attributes(&mut doc, doc_root, root);
        import_tree(&mut doc, doc_root, root);
        for node in doc.elements() {
            init_form_value(&mut doc, node);
        }
        if doc.body().is_none() {
            let body = doc.create_element("body");
            doc.append_child(doc_root, body);
        }
        doc.assign_synthetic_layout();
        debug!(
            elements = doc.elements().len(),
            "parsed HTML snapshot"
        );
        doc
    }

    /// Give every connected element a layout box derived from its markup.
    pub(crate) fn assign_synthetic_layout(&mut self) {
        let mut y = 0.0;
        // (node, beneath a hidden ancestor)
        let mut stack = vec![(self.root(), false)];
        while let Some((node, hidden_above)) = stack.pop() {
            if self.element(node).is_none() {
                continue;
            }
            let hidden = hidden_above || self.is_hidden(node);
            let (default_width, height) = default_box(self.tag(node).unwrap_or_default());
            let width = if hidden {
                0.0
            } else {
                self.style_property(node, "width")
                    .and_then(|w| parse_px(&w))
                    .unwrap_or(default_width)
            };
            let height = if hidden { 0.0 } else { height };
            self.set_rect(node, Rect::new(0.0, y, width, height));
            y += height;
            stack.extend(self.children(node).iter().rev().map(|&child| (child, hidden)));
        }
    }
}

/// Copy the parsed tree below `source` into `doc`. Walks with an explicit
/// stack: host pages can nest arbitrarily deep.
fn import_tree(doc: &mut Document, parent: NodeId, source: ElementRef<'_>) {
    let mut stack = vec![(parent, source)];
    while let Some((parent, source)) = stack.pop() {
        for child in source.children() {
            match child.value() {
                Node::Text(text) => {
                    let node = doc.create_text(&**text);
                    doc.append_child(parent, node);
                }
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let node = doc.create_element(child_el.value().name());
                    copy_attributes(doc, node, child_el);
                    doc.append_child(parent, node);
                    stack.push((node, child_el));
                }
                _ => {}
            }
        }
    }
}

fn copy_attributes(doc: &mut Document, node: NodeId, source: ElementRef<'_>) {
    for (name, value) in source.value().attrs() {
        doc.set_attr(node, name, value);
    }
}

/// Form controls start with the value the markup declares.
fn init_form_value(doc: &mut Document, node: NodeId) {
    let initial = if doc.is_tag(node, "input") {
        doc.attr(node, "value").map(str::to_string)
    } else if doc.is_tag(node, "textarea") {
        Some(doc.text_content(node))
    } else {
        None
    };
    if let Some(initial) = initial {
        doc.set_value(node, initial);
    }
}

fn default_box(tag: &str) -> (f32, f32) {
    match tag {
        "input" => (180.0, 24.0),
        "textarea" => (320.0, 80.0),
        "button" => (96.0, 32.0),
        "label" | "span" | "a" | "strong" | "em" | "code" => (80.0, 18.0),
        _ => (640.0, 20.0),
    }
}

fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}
