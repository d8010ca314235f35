//! One extraction pass over a document.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::LauncherConfig;
use crate::dom::Document;
use crate::locators::{
    body_via_buttons, locate_body, locate_subject, subject_via_buttons, LocatorContext,
};
use crate::normalize::normalize_subject;
use crate::types::{ExtractionResult, Provenance, StrategyTag};

/// Result of one pass plus where each side came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub provenance: Provenance,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

/// Run subject and body chains, consult copy buttons for whichever side came
/// back blank, then normalize.
#[instrument(skip_all)]
pub fn extract(doc: &Document, config: &LauncherConfig) -> Extraction {
    let ctx = LocatorContext::new(&config.limits);
    let mut provenance = Provenance::default();

    let mut subject_raw = String::new();
    if let Some(candidate) = locate_subject(doc, &ctx) {
        subject_raw = match doc.value(candidate.node).filter(|v| !v.is_empty()) {
            Some(value) => value.to_string(),
            None => doc.text_content(candidate.node),
        };
        provenance.subject = Some(candidate.strategy);
    }
    if subject_raw.trim().is_empty() {
        if let Some(text) = subject_via_buttons(doc, &ctx) {
            subject_raw = text;
            provenance.subject = Some(StrategyTag::ButtonProximity);
        }
    }

    let mut body_raw = String::new();
    if let Some(candidate) = locate_body(doc, &ctx) {
        body_raw = doc.field_text(candidate.node);
        provenance.body = Some(candidate.strategy);
    }
    if body_raw.trim().is_empty() {
        if let Some(text) = body_via_buttons(doc, &ctx) {
            body_raw = text;
            provenance.body = Some(StrategyTag::ButtonProximity);
        }
    }

    let result = ExtractionResult::from_raw(&subject_raw, &body_raw, &config.limits);
    if normalize_subject(&subject_raw, config.limits.subject_max_chars).is_empty() {
        provenance.subject = None;
        provenance.derived_subject = result.has_subject();
    }
    if result.body.is_empty() {
        provenance.body = None;
    }

    debug!(
        subject_chars = result.subject.chars().count(),
        body_chars = result.body.chars().count(),
        subject_from = ?provenance.subject,
        body_from = ?provenance.body,
        derived = provenance.derived_subject,
        "extraction pass finished"
    );
    Extraction { result, provenance }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Extraction {
        extract(&Document::parse_html(html), &LauncherConfig::default())
    }

    #[test]
    fn test_subject_and_body_from_direct_locators() {
        let extraction = run(r#"
            <input id="subject-field" value="  Hello   there  ">
            <textarea>Body line one


            Body line two</textarea>"#);
        assert_eq!(extraction.result.subject, "Hello there");
        assert_eq!(extraction.provenance.subject, Some(StrategyTag::Attribute));
        assert_eq!(extraction.provenance.body, Some(StrategyTag::LargestEditable));
        assert!(!extraction.provenance.derived_subject);
    }

    #[test]
    fn test_derived_subject_provenance() {
        let extraction = run("<textarea>Just a note</textarea>");
        assert_eq!(extraction.result.subject, "Just a note");
        assert_eq!(extraction.result.body, "Just a note");
        assert!(extraction.provenance.derived_subject);
        assert_eq!(extraction.provenance.subject, None);
    }

    #[test]
    fn test_empty_subject_field_consults_buttons() {
        let extraction = run(r#"
            <input name="subject" value="">
            <div><input placeholder="Objet" value="From the card"><button>Copier Objet</button></div>"#);
        // The attribute strategy finds the empty input first
        assert_eq!(extraction.result.subject, "From the card");
        assert_eq!(
            extraction.provenance.subject,
            Some(StrategyTag::ButtonProximity)
        );
    }

    #[test]
    fn test_empty_body_region_consults_buttons() {
        let extraction = run(r#"
            <div data-email-body></div>
            <div><textarea>Real body</textarea><button>Copy Body</button></div>"#);
        assert_eq!(extraction.result.body, "Real body");
        assert_eq!(extraction.provenance.body, Some(StrategyTag::ButtonProximity));
    }

    #[test]
    fn test_empty_document_yields_empty_result() {
        let extraction = run("<p>Nothing to see</p>");
        assert!(extraction.is_empty());
        assert_eq!(extraction.provenance, Provenance::default());
    }
}
