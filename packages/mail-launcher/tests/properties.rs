//! Property tests over the pipeline and the hand-off.

use proptest::prelude::*;

use mail_launcher::{
    extract, normalize_body, normalize_subject, Document, ExtractionResult, LaunchPayload,
    LauncherConfig, Limits, StrategyTag,
};

/// Page with an input named `objet` and a textarea, both filled programmatically.
fn objet_page(subject: &str, body: &str) -> Document {
    let mut doc = Document::parse_html(
        r#"<div class="card">
             <label>Notes</label><input type="text" id="notes" value="unrelated">
             <input name="objet" id="target-subject">
             <textarea id="target-body"></textarea>
           </div>"#,
    );
    let input = doc.get_element_by_id("target-subject").unwrap();
    let area = doc.get_element_by_id("target-body").unwrap();
    doc.set_value(input, subject);
    doc.set_value(area, body);
    doc
}

proptest! {
    #[test]
    fn prop_objet_input_and_textarea_always_selected(
        subject in "[A-Za-z][A-Za-z0-9 ]{0,60}",
        body in "[A-Za-z][A-Za-z0-9 \\n]{0,200}",
    ) {
        let doc = objet_page(&subject, &body);
        let config = LauncherConfig::default();

        let first = extract(&doc, &config);
        let second = extract(&doc, &config);
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.provenance.subject, Some(StrategyTag::Attribute));
        prop_assert_eq!(first.provenance.body, Some(StrategyTag::LargestEditable));
        prop_assert_eq!(first.result.subject, normalize_subject(&subject, 200));
        prop_assert_eq!(first.result.body, normalize_body(&body));
    }

    #[test]
    fn prop_mailto_round_trips(subject in "\\PC{0,120}", body in "\\PC{0,400}") {
        let result = ExtractionResult::from_raw(&subject, &body, &Limits::default());
        let payload = LaunchPayload::from_result(&result, "Subject: ");

        let (decoded_subject, decoded_body) = payload.decode_mailto().unwrap();
        prop_assert_eq!(decoded_subject, result.subject.clone());
        prop_assert_eq!(decoded_body, result.body.clone());
    }

    #[test]
    fn prop_clipboard_and_mailto_agree(subject in "\\PC{0,80}", body in "\\PC{0,200}") {
        let result = ExtractionResult::from_raw(&subject, &body, &Limits::default());
        let payload = LaunchPayload::from_result(&result, "Subject: ");

        let (decoded_subject, decoded_body) = payload.decode_mailto().unwrap();
        if decoded_subject.is_empty() {
            prop_assert_eq!(payload.clipboard_text, decoded_body);
        } else {
            prop_assert_eq!(
                payload.clipboard_text,
                format!("Subject: {}\n\n{}", decoded_subject, decoded_body)
            );
        }
    }

    #[test]
    fn prop_long_subjects_cut_cleanly(subject in "[a-z]{1,10}( [a-z]{1,10}){40,60}") {
        prop_assume!(subject.chars().count() > 200);
        let normalized = normalize_subject(&subject, 200);
        prop_assert!(normalized.chars().count() <= 200);
        prop_assert!(!normalized.ends_with(' '));
        prop_assert!(subject.starts_with(&normalized));
    }
}
