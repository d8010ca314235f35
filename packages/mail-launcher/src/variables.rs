//! `<<Name>>` variable tokens shared by templates and the variable picker.
//!
//! Templates render into ordinary form fields, which is all the extraction
//! pipeline needs to know about them. What is shared is the token syntax
//! and the notion of "the" editor a token gets inserted into.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{Document, NodeId};
use crate::error::{LauncherError, Result};
use crate::locators::OWNED_MARKER;

lazy_static! {
    /// `<<Name>>`, tolerating whitespace inside the brackets.
    static ref TOKEN: Regex =
        Regex::new(r"<<\s*([-A-Za-z0-9_.À-ÖØ-öø-ÿ]+)\s*>>").unwrap();
    static ref NAME: Regex = Regex::new(r"^[-A-Za-z0-9_.À-ÖØ-öø-ÿ]+$").unwrap();
}

/// Wrap `name` in token brackets.
pub fn token(name: &str) -> String {
    format!("<<{}>>", name)
}

pub fn is_valid_variable_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Distinct variable names in `text`, first-seen order. Names differing
/// only in case count once; the first spelling wins.
pub fn detect_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TOKEN
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

/// Editor a variable gets inserted into: the focused textarea or
/// content-editable element, else the first textarea, else the first
/// `contenteditable="true"` element.
pub fn find_primary_editor(doc: &Document) -> Option<NodeId> {
    let not_own = |node: NodeId| !doc.has_attr(node, OWNED_MARKER);

    if let Some(active) = doc.active_element().filter(|&n| not_own(n)) {
        if doc.is_tag(active, "textarea") || doc.is_content_editable(active) {
            return Some(active);
        }
    }
    doc.elements_by_tag("textarea")
        .into_iter()
        .find(|&n| not_own(n))
        .or_else(|| {
            doc.elements().into_iter().find(|&n| {
                not_own(n)
                    && doc
                        .attr(n, "contenteditable")
                        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
            })
        })
}

/// Insert `text` at the caret of `node`.
///
/// Textareas replace their selection and park the caret after the inserted
/// text (a textarea with no recorded selection inserts at the end).
/// Content-editable elements get the text appended. Returns `false` for
/// anything else.
pub fn insert_at_cursor(doc: &mut Document, node: NodeId, text: &str) -> Result<bool> {
    if !doc.is_connected(node) {
        return Err(LauncherError::StaleNode(node));
    }

    if doc.is_tag(node, "textarea") {
        let value = doc.value(node).unwrap_or_default().to_string();
        let len = value.chars().count();
        let (start, end) = doc.selection_range(node).unwrap_or((len, len));
        let (start, end) = (start.min(len), end.min(len));

        let mut updated: String = value.chars().take(start).collect();
        updated.push_str(text);
        updated.extend(value.chars().skip(end));
        doc.set_value(node, updated);

        let caret = start + text.chars().count();
        doc.set_selection_range(node, caret, caret);
        return Ok(true);
    }

    if doc.is_content_editable(node) {
        let text_node = doc.create_text(text);
        doc.append_child(node, text_node);
        return Ok(true);
    }

    debug!(node = ?node, "insert target is not editable");
    Ok(false)
}

/// One message template: subject and body with `<<Name>>` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub subject: String,
    pub body: String,
    /// Variables the template declares it uses.
    #[serde(default)]
    pub variables: Vec<String>,
}

/// A template with its placeholders substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
}

impl Template {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            body: body.into(),
            variables: Vec::new(),
        }
    }

    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = variables.into_iter().map(Into::into).collect();
        self
    }

    /// Placeholders used in subject then body, exact spelling, first-seen order.
    pub fn placeholders(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        [&self.subject, &self.body]
            .into_iter()
            .flat_map(|text| TOKEN.captures_iter(text))
            .map(|caps| caps[1].to_string())
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Placeholders the template uses without declaring them.
    pub fn undeclared_placeholders(&self) -> Vec<String> {
        self.placeholders()
            .into_iter()
            .filter(|name| !self.variables.contains(name))
            .collect()
    }

    /// Declared variables no placeholder refers to.
    pub fn unused_variables(&self) -> Vec<String> {
        let used = self.placeholders();
        self.variables
            .iter()
            .filter(|name| !used.contains(name))
            .cloned()
            .collect()
    }

    /// Substitute known values. Tokens without a value stay as written.
    pub fn render(&self, values: &HashMap<String, String>) -> RenderedTemplate {
        let substitute = |text: &str| {
            TOKEN
                .replace_all(text, |caps: &Captures| {
                    values
                        .get(&caps[1])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned()
        };
        RenderedTemplate {
            subject: substitute(&self.subject),
            body: substitute(&self.body),
        }
    }
}
