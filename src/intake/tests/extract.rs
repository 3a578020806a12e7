use super::common::extractor;
use crate::intake::classify::InputLabel;
use crate::intake::domain::IntakeField;

#[test]
fn repetitive_paste_offers_the_deduplicated_unit_once() {
    let pasted = "Jordan Example Jordan Example Jordan Example Jordan Example Jordan Example";
    let candidates = extractor().extract(pasted, InputLabel::RepetitivePaste, IntakeField::FullName);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].field, IntakeField::FullName);
    assert_eq!(candidates[0].value, "Jordan Example");
}

#[test]
fn history_repeat_without_internal_repetition_offers_the_whole_message() {
    let candidates =
        extractor().extract("I am not sure yet", InputLabel::RepetitivePaste, IntakeField::Email);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].value, "I am not sure yet");
}

#[test]
fn mixed_content_yields_only_pattern_bearing_fields() {
    let candidates = extractor().extract(
        "please fill this: my email is a@b.com and I use Python",
        InputLabel::MixedContent,
        IntakeField::FullName,
    );

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].field, IntakeField::Email);
    assert_eq!(candidates[0].value, "a@b.com");
    assert_eq!(candidates[1].field, IntakeField::TechStack);
    assert_eq!(candidates[1].value, "Python");
    assert!(candidates
        .iter()
        .all(|candidate| candidate.field != IntakeField::FullName));
}

#[test]
fn mixed_content_picks_up_phone_and_experience_mentions() {
    let candidates = extractor().extract(
        "here is my info: 8 years, call 515-555-0100",
        InputLabel::MixedContent,
        IntakeField::FullName,
    );

    let phone = candidates
        .iter()
        .find(|candidate| candidate.field == IntakeField::Phone)
        .expect("phone candidate");
    assert_eq!(phone.value, "5155550100");

    let years = candidates
        .iter()
        .find(|candidate| candidate.field == IntakeField::YearsExperience)
        .expect("experience candidate");
    assert_eq!(years.value, "8");
}

#[test]
fn assignment_paste_is_mined_for_technologies_only() {
    let brief = "You must build the service in Python with Django on PostgreSQL and ship it with Docker.";
    let candidates =
        extractor().extract(brief, InputLabel::AssignmentPaste, IntakeField::DesiredPosition);

    assert!(!candidates.is_empty());
    assert!(candidates
        .iter()
        .all(|candidate| candidate.field == IntakeField::TechStack));
    let names: Vec<&str> = candidates
        .iter()
        .map(|candidate| candidate.value.as_str())
        .collect();
    assert!(names.contains(&"Python"));
    assert!(names.contains(&"Django"));
    assert!(names.contains(&"PostgreSQL"));
    assert!(names.contains(&"Docker"));
}

#[test]
fn acknowledgments_and_fallthrough_labels_yield_nothing() {
    for label in [
        InputLabel::BareAcknowledgment,
        InputLabel::Unrecognized,
        InputLabel::ValidAnswer,
    ] {
        let candidates = extractor().extract("ok", label, IntakeField::Email);
        assert!(candidates.is_empty(), "{label:?}");
    }
}
