use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{IntakeField, Speaker, Turn};
use super::validate::{self, FieldValidator};
use super::vocabulary::TechVocabulary;
use crate::config::IntakeConfig;

/// Label assigned to one raw candidate message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputLabel {
    RepetitivePaste,
    AssignmentPaste,
    BareAcknowledgment,
    MixedContent,
    Unrecognized,
    ValidAnswer,
}

/// The named rule that fired plus the fragment that triggered it, so
/// re-prompt wording can explain the decision to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub rule: &'static str,
    pub matched: String,
}

/// A value proposed for a field by the extractor, pending validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCandidate {
    pub field: IntakeField,
    pub value: String,
}

/// Outcome of classifying a single turn. Ephemeral: produced and consumed
/// within the turn, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub label: InputLabel,
    pub evidence: Evidence,
    pub candidates: Vec<FieldCandidate>,
}

const ACKNOWLEDGMENTS: &[&str] = &["ok", "okay", "sure", "yes", "fine", "alright", "k"];

const DIRECTIVE_PHRASES: &[&str] = &[
    "please fill",
    "fill this",
    "fill in",
    "fill out",
    "answer the following",
    "use the following",
    "complete this",
    "complete the",
    "copy this",
    "as follows",
    "here is",
    "below is",
    "ignore the above",
];

static INSTRUCTION_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(must|should|implement|requirements?|deliverables?|submit|submission|write a function|your task)\b")
        .expect("instruction markers")
});

static NUMBERED_REQUIREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s").expect("numbered requirements"));

/// Ordered-rule classifier. Rules are evaluated top to bottom and the first
/// match wins, which keeps precedence explicit and the result deterministic.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: IntakeConfig,
    vocabulary: TechVocabulary,
    validator: FieldValidator,
}

type Rule = fn(&Classifier, &str) -> Option<(InputLabel, Evidence)>;

const RULES: [Rule; 4] = [
    Classifier::repetitive_paste_rule,
    Classifier::assignment_paste_rule,
    Classifier::bare_acknowledgment_rule,
    Classifier::mixed_content_rule,
];

impl Classifier {
    pub fn new(config: IntakeConfig) -> Self {
        let validator = FieldValidator::new(config.clone());
        Self {
            config,
            vocabulary: TechVocabulary::default(),
            validator,
        }
    }

    /// Label a raw message given the field currently being asked for.
    pub fn classify(
        &self,
        raw: &str,
        expected: IntakeField,
        recent_history: &[Turn],
    ) -> ClassificationResult {
        if let Some(evidence) = self.repeat_of_previous_turn(raw, recent_history) {
            return ClassificationResult {
                label: InputLabel::RepetitivePaste,
                evidence,
                candidates: Vec::new(),
            };
        }

        for rule in RULES {
            if let Some((label, evidence)) = rule(self, raw) {
                return ClassificationResult {
                    label,
                    evidence,
                    candidates: Vec::new(),
                };
            }
        }

        match self.validator.validate(expected, raw) {
            Ok(normalized) => ClassificationResult {
                label: InputLabel::ValidAnswer,
                evidence: Evidence {
                    rule: "expected_field_validator",
                    matched: normalized,
                },
                candidates: Vec::new(),
            },
            Err(error) => ClassificationResult {
                label: InputLabel::Unrecognized,
                evidence: Evidence {
                    rule: "fallback",
                    matched: error.to_string(),
                },
                candidates: Vec::new(),
            },
        }
    }

    fn repeat_of_previous_turn(&self, raw: &str, history: &[Turn]) -> Option<Evidence> {
        let previous = history
            .iter()
            .rev()
            .find(|turn| turn.speaker == Speaker::Candidate)?;
        let trimmed = raw.trim();
        if !trimmed.is_empty() && previous.text.trim().eq_ignore_ascii_case(trimmed) {
            Some(Evidence {
                rule: "repeat_of_previous_message",
                matched: truncate(trimmed, 80),
            })
        } else {
            None
        }
    }

    fn repetitive_paste_rule(&self, raw: &str) -> Option<(InputLabel, Evidence)> {
        let finding = find_repetition(raw, &self.config)?;
        Some((
            InputLabel::RepetitivePaste,
            Evidence {
                rule: finding.rule,
                matched: truncate(&finding.unit, 80),
            },
        ))
    }

    fn assignment_paste_rule(&self, raw: &str) -> Option<(InputLabel, Evidence)> {
        if raw.chars().count() <= self.config.assignment_length_threshold {
            return None;
        }
        if let Some(marker) = instruction_marker(raw) {
            return Some((
                InputLabel::AssignmentPaste,
                Evidence {
                    rule: "long_text_with_instruction_markers",
                    matched: marker,
                },
            ));
        }
        let mentions = self.vocabulary.matches(raw);
        if mentions.len() >= self.config.assignment_min_tech_mentions {
            return Some((
                InputLabel::AssignmentPaste,
                Evidence {
                    rule: "long_prose_with_many_technologies",
                    matched: mentions.join(", "),
                },
            ));
        }
        None
    }

    fn bare_acknowledgment_rule(&self, raw: &str) -> Option<(InputLabel, Evidence)> {
        let normalized = raw
            .trim()
            .trim_end_matches(['.', '!'])
            .to_lowercase();
        if ACKNOWLEDGMENTS.contains(&normalized.as_str()) {
            Some((
                InputLabel::BareAcknowledgment,
                Evidence {
                    rule: "acknowledgment_token",
                    matched: normalized,
                },
            ))
        } else {
            None
        }
    }

    fn mixed_content_rule(&self, raw: &str) -> Option<(InputLabel, Evidence)> {
        let lowered = raw.to_lowercase();
        let directive = DIRECTIVE_PHRASES
            .iter()
            .find(|phrase| lowered.contains(*phrase))?;

        let value_present = validate::find_email(raw).is_some()
            || validate::find_experience_mention(raw).is_some()
            || !self.vocabulary.matches(raw).is_empty();
        if !value_present {
            return None;
        }

        Some((
            InputLabel::MixedContent,
            Evidence {
                rule: "directive_with_embedded_value",
                matched: (*directive).to_string(),
            },
        ))
    }
}

pub(crate) struct RepetitionFinding {
    pub rule: &'static str,
    pub unit: String,
}

/// Detect copy-paste repetition: a dominant line, a consecutive token run,
/// or the whole text being one token block repeated.
pub(crate) fn find_repetition(text: &str, config: &IntakeConfig) -> Option<RepetitionFinding> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() >= 3 {
        let mut counts: HashMap<String, (usize, &str)> = HashMap::new();
        for line in &lines {
            let entry = counts.entry(line.to_lowercase()).or_insert((0, *line));
            entry.0 += 1;
        }
        if let Some((count, original)) = counts.values().max_by_key(|(count, _)| *count) {
            if *count as f32 / lines.len() as f32 > config.repetition_line_ratio {
                return Some(RepetitionFinding {
                    rule: "dominant_repeated_line",
                    unit: (*original).to_string(),
                });
            }
        }
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut run = 1usize;
    for pair in tokens.windows(2) {
        if pair[0].eq_ignore_ascii_case(pair[1]) {
            run += 1;
            if run >= config.repetition_min_runs {
                return Some(RepetitionFinding {
                    rule: "consecutive_token_run",
                    unit: pair[0].to_string(),
                });
            }
        } else {
            run = 1;
        }
    }

    for period in 2..=8usize {
        if tokens.len() < period * config.repetition_min_runs || tokens.len() % period != 0 {
            continue;
        }
        let first = &tokens[..period];
        let repeated = tokens
            .chunks(period)
            .all(|chunk| {
                chunk
                    .iter()
                    .zip(first.iter())
                    .all(|(a, b)| a.eq_ignore_ascii_case(b))
            });
        if repeated {
            return Some(RepetitionFinding {
                rule: "repeated_token_block",
                unit: first.join(" "),
            });
        }
    }

    None
}

pub(crate) fn looks_repetitive(text: &str, config: &IntakeConfig) -> bool {
    find_repetition(text, config).is_some()
}

/// Marker-only assignment check shared with the free-text validators.
pub(crate) fn looks_like_assignment(text: &str, config: &IntakeConfig) -> bool {
    text.chars().count() > config.assignment_length_threshold && instruction_marker(text).is_some()
}

fn instruction_marker(text: &str) -> Option<String> {
    if let Some(m) = INSTRUCTION_MARKER_RE.find(text) {
        return Some(m.as_str().to_lowercase());
    }
    if NUMBERED_REQUIREMENT_RE.is_match(text) {
        return Some("numbered requirements".to_string());
    }
    None
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
