use super::classify::{self, FieldCandidate, InputLabel};
use super::domain::IntakeField;
use super::validate;
use super::vocabulary::TechVocabulary;
use crate::config::IntakeConfig;

/// Pulls usable values out of messages that did not classify as clean
/// answers. Extraction only proposes candidates; the state machine still
/// validates each one before accepting it, and never lets a proposal
/// overwrite an accepted field.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: IntakeConfig,
    vocabulary: TechVocabulary,
}

impl Extractor {
    pub fn new(config: IntakeConfig) -> Self {
        Self {
            config,
            vocabulary: TechVocabulary::default(),
        }
    }

    pub fn extract(
        &self,
        raw: &str,
        label: InputLabel,
        expected: IntakeField,
    ) -> Vec<FieldCandidate> {
        match label {
            InputLabel::RepetitivePaste => self.from_repetitive(raw, expected),
            InputLabel::AssignmentPaste => self.tech_candidates(raw),
            InputLabel::MixedContent => self.from_mixed(raw),
            InputLabel::BareAcknowledgment
            | InputLabel::Unrecognized
            | InputLabel::ValidAnswer => Vec::new(),
        }
    }

    /// Deduplicate the repeated unit and offer it for the field being asked.
    fn from_repetitive(&self, raw: &str, expected: IntakeField) -> Vec<FieldCandidate> {
        match classify::find_repetition(raw, &self.config) {
            Some(finding) => vec![FieldCandidate {
                field: expected,
                value: finding.unit,
            }],
            // The previous-message repeat rule has no dominant unit inside
            // this text; offer the whole trimmed message.
            None => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    vec![FieldCandidate {
                        field: expected,
                        value: trimmed.to_string(),
                    }]
                }
            }
        }
    }

    /// Assignment briefs are mined for technology names only; this is the one
    /// case where extraction populates a field other than the one asked for.
    fn tech_candidates(&self, raw: &str) -> Vec<FieldCandidate> {
        self.vocabulary
            .matches(raw)
            .into_iter()
            .map(|name| FieldCandidate {
                field: IntakeField::TechStack,
                value: name,
            })
            .collect()
    }

    /// Mixed messages carry a directive plus at least one recognizable value.
    /// Only pattern-bearing fields are scanned; the free-text validators
    /// accept nearly any prose, so matching them against fragments of a
    /// directive-laden message would capture instruction text as data.
    fn from_mixed(&self, raw: &str) -> Vec<FieldCandidate> {
        let mut candidates = Vec::new();

        if let Some(email) = validate::find_email(raw) {
            candidates.push(FieldCandidate {
                field: IntakeField::Email,
                value: email,
            });
        }
        if let Some(phone) = validate::find_phone(raw) {
            candidates.push(FieldCandidate {
                field: IntakeField::Phone,
                value: phone,
            });
        }
        if let Some(years) = validate::find_experience_mention(raw) {
            candidates.push(FieldCandidate {
                field: IntakeField::YearsExperience,
                value: years,
            });
        }
        candidates.extend(self.tech_candidates(raw));

        candidates
    }
}
