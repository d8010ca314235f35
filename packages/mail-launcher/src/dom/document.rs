//! Arena-backed document tree.
//!
//! The host page is not ours: nodes can be removed or re-rendered between
//! ticks. A `NodeId` therefore stays valid after removal (the arena never
//! shrinks) but a removed node is no longer *connected* and disappears from
//! every query.

use std::fmt;

/// Index of a node in a [`Document`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout box of a rendered element, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Element payload.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,

    /// Attributes in source order, names lowercase
    pub attributes: Vec<(String, String)>,

    /// Live form value (`input`/`textarea` only)
    pub value: Option<String>,

    /// Caret/selection range in characters (`textarea`/`input` only)
    pub selection_range: Option<(usize, usize)>,

    /// Layout box, if the element is rendered
    pub rect: Option<Rect>,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Tags whose value lives in `ElementData::value`.
const FORM_CONTROLS: &[&str] = &["input", "textarea"];

/// Input types that accept free single-line text.
const TEXT_INPUT_TYPES: &[&str] = &["", "text", "search", "email", "url", "tel"];

/// Block-level tags that break lines in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Tags that never render.
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// A mutable document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    viewport: Viewport,
    active_element: Option<NodeId>,
    selection: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty `html > (head, body)` document.
    pub fn new() -> Self {
        let mut doc = Self::with_root("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.append_child(doc.root, head);
        doc.append_child(doc.root, body);
        doc
    }

    /// Create a document whose only node is a root element named `tag`.
    pub(crate) fn with_root(tag: &str) -> Self {
        let root = Node {
            data: NodeData::Element(ElementData {
                tag: tag.to_ascii_lowercase(),
                ..Default::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            viewport: Viewport::default(),
            active_element: None,
            selection: None,
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// The document element (`<html>`).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The first `<body>` child of the root.
    pub fn body(&self) -> Option<NodeId> {
        self.element_children(self.root)
            .find(|&id| self.is_tag(id, "body"))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        let value = FORM_CONTROLS
            .contains(&tag.as_str())
            .then(String::new);
        self.push(NodeData::Element(ElementData {
            tag,
            value,
            ..Default::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.contains(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detach `node` from the tree. Its id stays valid but disconnected.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
        if self.active_element.is_some_and(|a| self.contains(node, a)) {
            self.active_element = None;
        }
        if self.selection.is_some_and(|s| self.contains(node, s)) {
            self.selection = None;
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(move |&c| self.element(c).is_some())
    }

    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == node)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.element(c).is_some())
    }

    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == node)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&c| self.element(c).is_some())
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether `node` is attached to the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len() && self.contains(self.root, node)
    }

    /// Descendants of `root` in document (pre-)order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Descendant elements of `root` in document order, excluding `root`.
    pub fn descendant_elements(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.element(id).is_some())
            .collect()
    }

    /// All connected elements in document order, root included.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = vec![self.root];
        out.extend(self.descendant_elements(self.root));
        out
    }

    /// Connected elements with the given tag, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&id| self.is_tag(id, tag))
            .collect()
    }

    /// First connected element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.elements()
            .into_iter()
            .find(|&node| self.attr(node, "id") == Some(id))
    }

    // ------------------------------------------------------------------
    // Element data
    // ------------------------------------------------------------------

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(node.0).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Text(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    pub fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if let Some(el) = self.element_mut(node) {
            match el.attributes.iter_mut().find(|(k, _)| *k == name) {
                Some((_, v)) => *v = value,
                None => el.attributes.push((name, value)),
            }
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|token| token == class))
    }

    /// Inline style property, as written in the `style` attribute.
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let style = self.attr(node, "style")?;
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case(property)
                .then(|| value.trim().to_ascii_lowercase())
        })
    }

    /// Live value of a form control; `None` for other elements.
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.value.as_deref()
    }

    /// Set the live value and park the caret at its end.
    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        if let Some(el) = self.element_mut(node) {
            let value = value.into();
            let end = value.chars().count();
            el.value = Some(value);
            el.selection_range = Some((end, end));
        }
    }

    pub fn selection_range(&self, node: NodeId) -> Option<(usize, usize)> {
        self.element(node)?.selection_range
    }

    pub fn set_selection_range(&mut self, node: NodeId, start: usize, end: usize) {
        if let Some(el) = self.element_mut(node) {
            el.selection_range = Some((start.min(end), start.max(end)));
        }
    }

    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.element(node)?.rect
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(el) = self.element_mut(node) {
            el.rect = Some(rect);
        }
    }

    /// Rendered width; zero for elements without a layout box.
    pub fn offset_width(&self, node: NodeId) -> f32 {
        self.rect(node).map(|r| r.width).unwrap_or(0.0)
    }

    // ------------------------------------------------------------------
    // Focus and selection
    // ------------------------------------------------------------------

    pub fn focus(&mut self, node: NodeId) {
        if self.is_connected(node) {
            self.active_element = Some(node);
        }
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element.filter(|&n| self.is_connected(n))
    }

    /// Select the whole content of `node` (select-all).
    pub fn select_contents(&mut self, node: NodeId) {
        if let Some(el) = self.element_mut(node) {
            if let Some(len) = el.value.as_ref().map(|v| v.chars().count()) {
                el.selection_range = Some((0, len));
            }
        }
        self.selection = Some(node);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Text of the current selection, if any.
    pub fn selected_text(&self) -> Option<String> {
        let node = self.selection.filter(|&n| self.is_connected(n))?;
        match self.value(node) {
            Some(value) => {
                let (start, end) = self
                    .selection_range(node)
                    .unwrap_or((0, value.chars().count()));
                Some(value.chars().skip(start).take(end - start).collect())
            }
            None => Some(self.text_content(node)),
        }
    }

    // ------------------------------------------------------------------
    // Capability checks
    // ------------------------------------------------------------------

    /// Inherited `contenteditable` state.
    pub fn is_content_editable(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if let Some(flag) = self.attr(current, "contenteditable") {
                match flag.trim().to_ascii_lowercase().as_str() {
                    "" | "true" | "plaintext-only" => return true,
                    "false" => return false,
                    _ => {}
                }
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Textarea, content-editable region, or `role="textbox"`.
    pub fn is_editable(&self, node: NodeId) -> bool {
        self.is_tag(node, "textarea")
            || self.is_content_editable(node)
            || self
                .attr(node, "role")
                .is_some_and(|r| r.eq_ignore_ascii_case("textbox"))
    }

    /// Lowercased `type` attribute of an input; `None` when absent.
    pub fn input_type(&self, node: NodeId) -> Option<String> {
        self.attr(node, "type").map(|t| t.trim().to_ascii_lowercase())
    }

    /// Input accepting free single-line text.
    pub fn is_text_input(&self, node: NodeId) -> bool {
        self.is_tag(node, "input")
            && TEXT_INPUT_TYPES.contains(&self.input_type(node).unwrap_or_default().as_str())
    }

    /// Hidden by its own attributes or inline style.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        let Some(el) = self.element(node) else {
            return false;
        };
        NON_RENDERED_TAGS.contains(&el.tag.as_str())
            || self.has_attr(node, "hidden")
            || (el.tag == "input" && self.input_type(node).as_deref() == Some("hidden"))
            || self.style_property(node, "display").as_deref() == Some("none")
            || self.style_property(node, "visibility").as_deref() == Some("hidden")
    }

    /// Hidden itself or beneath a hidden ancestor.
    pub fn is_hidden_in_tree(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.is_hidden(current) {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of every descendant text node (`textContent`).
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }

    /// Approximation of `innerText`: hidden subtrees skipped, whitespace
    /// collapsed outside preformatted content, `<br>` and block boundaries
    /// turned into line breaks.
    pub fn rendered_text(&self, node: NodeId) -> String {
        let mut out = RenderedText::default();
        let mut stack = vec![RenderStep::Visit {
            node,
            preformatted: false,
        }];
        while let Some(step) = stack.pop() {
            match step {
                RenderStep::Close { breaks } => out.require_breaks(breaks),
                RenderStep::Visit { node, preformatted } => {
                    self.render_step(node, preformatted, &mut out, &mut stack)
                }
            }
        }
        out.finish()
    }

    /// Emit `node`'s own output and queue its children. The explicit stack
    /// keeps arbitrarily deep pages off the call stack.
    fn render_step(
        &self,
        node: NodeId,
        preformatted: bool,
        out: &mut RenderedText,
        stack: &mut Vec<RenderStep>,
    ) {
        if let Some(text) = self.text(node) {
            out.push_text(text, preformatted);
            return;
        }
        let Some(el) = self.element(node) else {
            return;
        };
        if self.is_hidden(node) {
            return;
        }
        match el.tag.as_str() {
            "br" => {
                out.push_line_break();
                return;
            }
            "input" => return,
            _ => {}
        }
        let breaks = match el.tag.as_str() {
            "p" => 2,
            tag if BLOCK_TAGS.contains(&tag) => 1,
            _ => 0,
        };
        let preformatted = preformatted
            || el.tag == "pre"
            || el.tag == "textarea"
            || self
                .style_property(node, "white-space")
                .is_some_and(|ws| ws.starts_with("pre") || ws == "break-spaces");
        out.require_breaks(breaks);
        stack.push(RenderStep::Close { breaks });
        stack.extend(
            self.children(node)
                .iter()
                .rev()
                .map(|&child| RenderStep::Visit {
                    node: child,
                    preformatted,
                }),
        );
    }

    /// What a user would call the field's text: value, else rendered text,
    /// else raw text content.
    pub fn field_text(&self, node: NodeId) -> String {
        if let Some(value) = self.value(node).filter(|v| !v.is_empty()) {
            return value.to_string();
        }
        let rendered = self.rendered_text(node);
        if !rendered.is_empty() {
            return rendered;
        }
        self.text_content(node)
    }
}

/// Pending work in [`Document::rendered_text`].
enum RenderStep {
    Visit { node: NodeId, preformatted: bool },
    /// Leaving an element: its trailing line breaks
    Close { breaks: usize },
}

/// Accumulator implementing the "required line break" part of `innerText`.
#[derive(Default)]
struct RenderedText {
    buf: String,
    pending_breaks: usize,
}

impl RenderedText {
    fn require_breaks(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
    }

    fn flush_breaks(&mut self) {
        if self.pending_breaks > 0 && !self.buf.is_empty() {
            let kept = self.buf.trim_end_matches(' ').len();
            self.buf.truncate(kept);
            let existing = self.buf.chars().rev().take_while(|&c| c == '\n').count();
            for _ in existing..self.pending_breaks {
                self.buf.push('\n');
            }
        }
        self.pending_breaks = 0;
    }

    fn push_line_break(&mut self) {
        self.flush_breaks();
        self.buf.push('\n');
    }

    fn push_text(&mut self, text: &str, preformatted: bool) {
        if preformatted {
            if !text.is_empty() {
                self.flush_breaks();
                self.buf.push_str(text);
            }
            return;
        }
        let collapsed = collapse_whitespace(text);
        let at_line_start = self.buf.is_empty() || self.buf.ends_with('\n');
        let collapsed = if at_line_start || self.pending_breaks > 0 || self.buf.ends_with(' ') {
            collapsed.trim_start()
        } else {
            collapsed.as_str()
        };
        if collapsed.is_empty() {
            return;
        }
        self.flush_breaks();
        self.buf.push_str(collapsed);
    }

    fn finish(self) -> String {
        let mut buf = self.buf;
        let trimmed = buf.trim_end_matches(' ').len();
        buf.truncate(trimmed);
        buf
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div_with(doc: &mut Document, parts: &[&str]) -> NodeId {
        let div = doc.create_element("div");
        for part in parts {
            let text = doc.create_text(*part);
            doc.append_child(div, text);
        }
        let body = doc.body().unwrap();
        doc.append_child(body, div);
        div
    }

    #[test]
    fn test_new_document_has_body() {
        let doc = Document::new();
        assert!(doc.body().is_some());
        assert!(doc.is_tag(doc.root(), "html"));
    }

    #[test]
    fn test_removed_node_is_disconnected() {
        let mut doc = Document::new();
        let div = div_with(&mut doc, &["x"]);
        doc.set_attr(div, "id", "target");
        assert_eq!(doc.get_element_by_id("target"), Some(div));

        doc.remove(div);
        assert!(!doc.is_connected(div));
        assert_eq!(doc.get_element_by_id("target"), None);
    }

    #[test]
    fn test_siblings_skip_text_nodes() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let a = doc.create_element("label");
        let gap = doc.create_text("  ");
        let b = doc.create_element("input");
        doc.append_child(body, a);
        doc.append_child(body, gap);
        doc.append_child(body, b);

        assert_eq!(doc.next_element_sibling(a), Some(b));
        assert_eq!(doc.previous_element_sibling(b), Some(a));
        assert_eq!(doc.previous_element_sibling(a), None);
    }

    #[test]
    fn test_content_editable_inheritance() {
        let mut doc = Document::new();
        let outer = div_with(&mut doc, &[]);
        doc.set_attr(outer, "contenteditable", "true");
        let inner = doc.create_element("span");
        doc.append_child(outer, inner);
        let locked = doc.create_element("span");
        doc.set_attr(locked, "contenteditable", "false");
        doc.append_child(outer, locked);

        assert!(doc.is_content_editable(outer));
        assert!(doc.is_content_editable(inner));
        assert!(!doc.is_content_editable(locked));
    }

    #[test]
    fn test_rendered_text_paragraphs_and_breaks() {
        let mut doc = Document::new();
        let editor = div_with(&mut doc, &[]);
        for line in ["Hello", "World"] {
            let p = doc.create_element("p");
            let t = doc.create_text(line);
            doc.append_child(p, t);
            doc.append_child(editor, p);
        }
        let tail = doc.create_text("a");
        let br = doc.create_element("br");
        let tail2 = doc.create_text("b");
        doc.append_child(editor, tail);
        doc.append_child(editor, br);
        doc.append_child(editor, tail2);

        assert_eq!(doc.rendered_text(editor), "Hello\n\nWorld\n\na\nb");
    }

    #[test]
    fn test_rendered_text_collapses_source_whitespace() {
        let mut doc = Document::new();
        let div = div_with(&mut doc, &["\n    Some   text\n  "]);
        assert_eq!(doc.rendered_text(div), "Some text");
        assert_eq!(doc.text_content(div), "\n    Some   text\n  ");
    }

    #[test]
    fn test_field_text_prefers_value() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let ta = doc.create_element("textarea");
        let initial = doc.create_text("initial");
        doc.append_child(ta, initial);
        doc.append_child(body, ta);
        assert_eq!(doc.field_text(ta), "initial");

        doc.set_value(ta, "typed");
        assert_eq!(doc.field_text(ta), "typed");
    }

    #[test]
    fn test_selected_text_of_textarea() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let ta = doc.create_element("textarea");
        doc.append_child(body, ta);
        doc.set_value(ta, "copy me");
        doc.select_contents(ta);
        assert_eq!(doc.selected_text().as_deref(), Some("copy me"));

        doc.remove(ta);
        assert_eq!(doc.selected_text(), None);
    }

    #[test]
    fn test_text_input_types() {
        let mut doc = Document::new();
        let plain = doc.create_element("input");
        let search = doc.create_element("input");
        doc.set_attr(search, "type", "Search");
        let checkbox = doc.create_element("input");
        doc.set_attr(checkbox, "type", "checkbox");

        assert!(doc.is_text_input(plain));
        assert!(doc.is_text_input(search));
        assert!(!doc.is_text_input(checkbox));
    }

    #[test]
    fn test_append_child_refuses_cycles() {
        let mut doc = Document::new();
        let outer = div_with(&mut doc, &[]);
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);
        doc.append_child(inner, outer);
        assert_eq!(doc.parent(inner), Some(outer));
        assert!(doc.is_connected(outer));
    }
}
