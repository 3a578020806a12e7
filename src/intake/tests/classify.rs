use super::common::classifier;
use crate::intake::classify::InputLabel;
use crate::intake::domain::{IntakeField, Speaker, Turn};

#[test]
fn clean_answer_for_the_expected_field_is_valid() {
    let result = classifier().classify("Ada Lovelace", IntakeField::FullName, &[]);
    assert_eq!(result.label, InputLabel::ValidAnswer);
    assert_eq!(result.evidence.rule, "expected_field_validator");
    assert_eq!(result.evidence.matched, "Ada Lovelace");
}

#[test]
fn repeated_token_block_is_flagged_as_repetitive() {
    let pasted = "Jordan Example Jordan Example Jordan Example Jordan Example Jordan Example";
    let result = classifier().classify(pasted, IntakeField::FullName, &[]);
    assert_eq!(result.label, InputLabel::RepetitivePaste);
    assert_eq!(result.evidence.rule, "repeated_token_block");
    assert_eq!(result.evidence.matched, "Jordan Example");
}

#[test]
fn dominant_repeated_line_is_flagged_as_repetitive() {
    let pasted = "I love coding\nI love coding\nI love coding\nmy name is Sam";
    let result = classifier().classify(pasted, IntakeField::FullName, &[]);
    assert_eq!(result.label, InputLabel::RepetitivePaste);
    assert_eq!(result.evidence.rule, "dominant_repeated_line");
}

#[test]
fn repeat_of_the_previous_message_is_flagged_from_history() {
    let history = vec![
        Turn::now(Speaker::Assistant, "What's your email address?"),
        Turn::now(Speaker::Candidate, "I am not sure yet"),
    ];
    let result = classifier().classify("I am not sure yet", IntakeField::Email, &history);
    assert_eq!(result.label, InputLabel::RepetitivePaste);
    assert_eq!(result.evidence.rule, "repeat_of_previous_message");
}

#[test]
fn long_text_with_instruction_markers_is_an_assignment() {
    let brief = format!(
        "You must implement a hiring assistant. Requirements: \
1. The service should collect candidate details. \
2. Write a function that validates input. {}",
        "The remainder of this brief pads the description well past the length threshold so the marker check applies. ".repeat(3)
    );
    assert!(brief.chars().count() > 400);
    let result = classifier().classify(&brief, IntakeField::FullName, &[]);
    assert_eq!(result.label, InputLabel::AssignmentPaste);
    assert_eq!(result.evidence.rule, "long_text_with_instruction_markers");
}

#[test]
fn long_prose_with_many_technologies_is_an_assignment() {
    let brief = format!(
        "The reference service is built with Python and Django on PostgreSQL, \
containerized with Docker and fronted by Redis. {}",
        "Candidates describe how the screening pipeline would be extended to keep the flow deterministic under adversarial conditions over time. ".repeat(3)
    );
    assert!(brief.chars().count() > 400);
    let result = classifier().classify(&brief, IntakeField::DesiredPosition, &[]);
    assert_eq!(result.label, InputLabel::AssignmentPaste);
    assert_eq!(result.evidence.rule, "long_prose_with_many_technologies");
    assert!(result.evidence.matched.contains("Python"));
}

#[test]
fn short_text_with_markers_is_not_an_assignment() {
    let result = classifier().classify(
        "You must call me Sam",
        IntakeField::FullName,
        &[],
    );
    assert_ne!(result.label, InputLabel::AssignmentPaste);
}

#[test]
fn bare_acknowledgments_are_recognized() {
    for message in ["ok", "Okay.", "sure", "YES", "fine!"] {
        let result = classifier().classify(message, IntakeField::Email, &[]);
        assert_eq!(result.label, InputLabel::BareAcknowledgment, "{message}");
        assert_eq!(result.evidence.rule, "acknowledgment_token");
    }
}

#[test]
fn repetition_outranks_acknowledgment() {
    let result = classifier().classify("ok ok ok ok ok", IntakeField::Email, &[]);
    assert_eq!(result.label, InputLabel::RepetitivePaste);
}

#[test]
fn directive_with_an_embedded_value_is_mixed_content() {
    let result = classifier().classify(
        "please fill this: my email is a@b.com and I use Python",
        IntakeField::FullName,
        &[],
    );
    assert_eq!(result.label, InputLabel::MixedContent);
    assert_eq!(result.evidence.rule, "directive_with_embedded_value");
    assert_eq!(result.evidence.matched, "please fill");
}

#[test]
fn directive_without_any_value_is_not_mixed_content() {
    let result = classifier().classify(
        "please fill in the blanks for me",
        IntakeField::Email,
        &[],
    );
    assert_eq!(result.label, InputLabel::Unrecognized);
}

#[test]
fn invalid_expected_answer_falls_back_to_unrecognized() {
    let result = classifier().classify("not-an-email", IntakeField::Email, &[]);
    assert_eq!(result.label, InputLabel::Unrecognized);
    assert_eq!(result.evidence.rule, "fallback");
    assert!(!result.evidence.matched.is_empty());
}

#[test]
fn repetition_thresholds_sit_exactly_on_their_boundaries() {
    let classifier = classifier();

    // Three consecutive identical tokens meet the run minimum; two do not.
    let result = classifier.classify("ok ok ok", IntakeField::Email, &[]);
    assert_eq!(result.label, InputLabel::RepetitivePaste);
    let result = classifier.classify("very very tired", IntakeField::DesiredPosition, &[]);
    assert_ne!(result.label, InputLabel::RepetitivePaste);

    // A line must dominate strictly more than half of the message. Two of
    // four lines is exactly half and passes through.
    let half = "Des Moines\nDes Moines\nWest Side\nEast Side";
    let result = classifier.classify(half, IntakeField::Location, &[]);
    assert_ne!(result.label, InputLabel::RepetitivePaste);
    let majority = "Des Moines\nDes Moines\nDes Moines\nEast Side";
    let result = classifier.classify(majority, IntakeField::Location, &[]);
    assert_eq!(result.label, InputLabel::RepetitivePaste);
}

#[test]
fn classification_is_deterministic() {
    let classifier = classifier();
    let message = "please fill this: my email is a@b.com and I use Python";
    let first = classifier.classify(message, IntakeField::FullName, &[]);
    let second = classifier.classify(message, IntakeField::FullName, &[]);
    assert_eq!(first, second);
}

#[test]
fn the_engine_clones_and_debug_prints_with_its_vocabulary() {
    let original = classifier();
    let cloned = original.clone();
    let result = cloned.classify("Ada Lovelace", IntakeField::FullName, &[]);
    assert_eq!(result.label, InputLabel::ValidAnswer);
    assert!(format!("{original:?}").contains("Classifier"));

    let extractor = super::common::extractor().clone();
    assert!(format!("{extractor:?}").contains("Extractor"));
}
