use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classify::{Classifier, FieldCandidate, InputLabel};
use super::domain::{
    CandidateRecord, IntakeField, QuestionAnswer, SessionId, Speaker, Turn,
};
use super::extract::Extractor;
use super::sentiment::{self, Sentiment};
use super::validate::{self, FieldValidator};
use crate::config::IntakeConfig;

const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "stop", "bye", "goodbye"];

const GREETING: &str = "Hello! I'm the TalentScout Hiring Assistant. I'll be helping with your initial screening process.\nCould you please tell me your full name to get started?";

const FAREWELL: &str = "Thank you for answering all the technical questions. Your responses have been recorded. The TalentScout team will review your application and get back to you soon.";

const EXIT_FAREWELL: &str =
    "Thank you for your time. The conversation has ended. Have a great day!";

/// Where the conversation currently sits. Transitions run strictly forward
/// through the field order, then questions, then done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    Collecting(IntakeField),
    TechQuestions,
    Done,
    Abandoned,
}

impl ConversationPhase {
    pub const fn label(self) -> &'static str {
        match self {
            ConversationPhase::Collecting(field) => field.key(),
            ConversationPhase::TechQuestions => "tech_questions",
            ConversationPhase::Done => "done",
            ConversationPhase::Abandoned => "abandoned",
        }
    }
}

/// What the state machine asks of its caller after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStep {
    /// Normal prompt or re-prompt; nothing else to do.
    Reply(String),
    /// Intake is complete: the caller must produce questions and hand them to
    /// [`ConversationState::begin_questions`].
    ReadyForQuestions,
    /// Questions are exhausted; the record is final and should be persisted.
    Completed { farewell: String },
    /// The session is over without a completed intake (exit keyword, or a
    /// turn arriving after the session closed).
    Ended { farewell: String },
}

/// Per-session conversation state: one candidate, advanced one turn at a
/// time, owned exclusively by its session.
#[derive(Debug, Clone)]
pub struct ConversationState {
    id: SessionId,
    phase: ConversationPhase,
    record: CandidateRecord,
    history: Vec<Turn>,
    reprompt_counts: BTreeMap<IntakeField, u8>,
    questions: Vec<String>,
    question_index: usize,
    answers: Vec<QuestionAnswer>,
    sentiments: Vec<Sentiment>,
    started_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(id: SessionId) -> Self {
        let mut state = Self {
            id,
            phase: ConversationPhase::Collecting(IntakeField::FullName),
            record: CandidateRecord::default(),
            history: Vec::new(),
            reprompt_counts: BTreeMap::new(),
            questions: Vec::new(),
            question_index: 0,
            answers: Vec::new(),
            sentiments: Vec::new(),
            started_at: Utc::now(),
        };
        state
            .history
            .push(Turn::now(Speaker::Assistant, GREETING));
        state
    }

    pub fn greeting() -> &'static str {
        GREETING
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn record(&self) -> &CandidateRecord {
        &self.record
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn answers(&self) -> &[QuestionAnswer] {
        &self.answers
    }

    pub fn sentiments(&self) -> &[Sentiment] {
        &self.sentiments
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Drive the state machine with one raw candidate message.
    pub fn handle_turn(
        &mut self,
        raw: &str,
        classifier: &Classifier,
        extractor: &Extractor,
        validator: &FieldValidator,
        config: &IntakeConfig,
    ) -> TurnStep {
        match self.phase {
            ConversationPhase::Done | ConversationPhase::Abandoned => {
                return TurnStep::Ended {
                    farewell: "This session has already ended. Thank you for your interest in TalentScout!".to_string(),
                };
            }
            _ => {}
        }

        let clean = validate::sanitize(raw);
        self.sentiments.push(sentiment::analyze(&clean));

        if is_exit_command(&clean) {
            self.history.push(Turn::now(Speaker::Candidate, clean));
            self.phase = ConversationPhase::Done;
            self.history
                .push(Turn::now(Speaker::Assistant, EXIT_FAREWELL));
            return TurnStep::Ended {
                farewell: EXIT_FAREWELL.to_string(),
            };
        }

        match self.phase {
            ConversationPhase::Collecting(field) => {
                self.collect_field(field, &clean, classifier, extractor, validator, config)
            }
            ConversationPhase::TechQuestions => self.record_answer(&clean),
            ConversationPhase::Done | ConversationPhase::Abandoned => unreachable!(),
        }
    }

    fn collect_field(
        &mut self,
        field: IntakeField,
        clean: &str,
        classifier: &Classifier,
        extractor: &Extractor,
        validator: &FieldValidator,
        config: &IntakeConfig,
    ) -> TurnStep {
        let mut result = classifier.classify(clean, field, &self.history);
        result.candidates = extractor.extract(clean, result.label, field);

        self.history
            .push(Turn::now(Speaker::Candidate, clean.to_string()));

        let mut captured: Vec<FieldCandidate> = Vec::new();

        if result.label == InputLabel::ValidAnswer {
            match validator.validate(field, clean) {
                Ok(normalized) => {
                    // A direct answer to the question being asked needs no
                    // capture note in the acknowledgment.
                    self.record.set(field, &normalized);
                }
                // The classifier already ran this validator, so this arm only
                // guards against divergence between the two call sites.
                Err(error) => {
                    return self.reprompt(
                        field,
                        config,
                        format!("I'm sorry, but {error}. {}", field.prompt()),
                    );
                }
            }
        } else {
            // Opportunistic fills: validate every proposal, never overwrite.
            for candidate in &result.candidates {
                if candidate.field != IntakeField::TechStack
                    && self.record.is_filled(candidate.field)
                {
                    continue;
                }
                if let Ok(normalized) = validator.validate(candidate.field, &candidate.value) {
                    if self.record.set(candidate.field, &normalized) {
                        captured.push(FieldCandidate {
                            field: candidate.field,
                            value: normalized,
                        });
                    }
                }
            }
        }

        if self.record.is_filled(field) {
            self.advance(&captured)
        } else {
            let message = self.reprompt_wording(field, result.label, &result.evidence.matched, &captured);
            self.reprompt(field, config, message)
        }
    }

    fn advance(&mut self, captured: &[FieldCandidate]) -> TurnStep {
        let note = capture_note(captured);
        match self.next_unfilled() {
            Some(next) => {
                self.phase = ConversationPhase::Collecting(next);
                let reply = format!("Thank you.{note} {}", next.prompt());
                self.history.push(Turn::now(Speaker::Assistant, &reply));
                TurnStep::Reply(reply)
            }
            None => {
                self.phase = ConversationPhase::TechQuestions;
                TurnStep::ReadyForQuestions
            }
        }
    }

    fn next_unfilled(&self) -> Option<IntakeField> {
        IntakeField::ALL
            .iter()
            .copied()
            .find(|field| !self.record.is_filled(*field))
    }

    fn reprompt(&mut self, field: IntakeField, config: &IntakeConfig, message: String) -> TurnStep {
        let count = self.reprompt_counts.entry(field).or_insert(0);
        *count += 1;
        if *count >= config.reprompt_cap {
            self.phase = ConversationPhase::Abandoned;
            let terminal = format!(
                "I'm sorry, I wasn't able to capture your {} after several attempts. Please contact the TalentScout team directly so a recruiter can finish your registration.",
                field.label()
            );
            self.history.push(Turn::now(Speaker::Assistant, &terminal));
            return TurnStep::Reply(terminal);
        }
        self.history.push(Turn::now(Speaker::Assistant, &message));
        TurnStep::Reply(message)
    }

    /// Distinct wording per label so the candidate understands why the input
    /// was not accepted.
    fn reprompt_wording(
        &self,
        field: IntakeField,
        label: InputLabel,
        evidence: &str,
        captured: &[FieldCandidate],
    ) -> String {
        let note = capture_note(captured);
        match label {
            InputLabel::RepetitivePaste => format!(
                "That looks like repeated pasted text.{note} Could you tell me your actual {}?",
                field.label()
            ),
            InputLabel::AssignmentPaste => format!(
                "That reads like a pasted assignment brief rather than a personal answer.{note} Could you tell me your {}?",
                field.label()
            ),
            InputLabel::BareAcknowledgment => format!(
                "Got it — but I still need your {}. {}",
                field.label(),
                field.prompt()
            ),
            InputLabel::MixedContent => format!(
                "I spotted some details in your message.{note} I still need your {} though. {}",
                field.label(),
                field.prompt()
            ),
            InputLabel::Unrecognized => format!(
                "I'm sorry, but {evidence}. {}",
                field.prompt()
            ),
            InputLabel::ValidAnswer => format!(
                "I'm sorry, but I need a valid {}. {}",
                field.label(),
                field.prompt()
            ),
        }
    }

    /// Install the generated questions and produce the hand-off message.
    /// Callers guarantee a non-empty sequence (the generator contract).
    pub fn begin_questions(&mut self, questions: Vec<String>) -> String {
        debug_assert!(!questions.is_empty());
        self.questions = questions;
        self.question_index = 0;
        let intro = format!(
            "Great! Based on your tech stack ({}), I'd like to ask you a few technical questions.\n\nQuestion 1: {}",
            self.record.tech_stack.join(", "),
            self.questions[0]
        );
        self.history.push(Turn::now(Speaker::Assistant, &intro));
        intro
    }

    fn record_answer(&mut self, clean: &str) -> TurnStep {
        self.history
            .push(Turn::now(Speaker::Candidate, clean.to_string()));
        if let Some(question) = self.questions.get(self.question_index) {
            self.answers.push(QuestionAnswer {
                question: question.clone(),
                answer: clean.to_string(),
            });
        }
        self.question_index += 1;

        if self.question_index < self.questions.len() {
            let reply = format!(
                "Thank you for your answer.\n\nQuestion {}: {}",
                self.question_index + 1,
                self.questions[self.question_index]
            );
            self.history.push(Turn::now(Speaker::Assistant, &reply));
            TurnStep::Reply(reply)
        } else {
            self.phase = ConversationPhase::Done;
            self.history.push(Turn::now(Speaker::Assistant, FAREWELL));
            TurnStep::Completed {
                farewell: FAREWELL.to_string(),
            }
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            phase: self.phase.label(),
            captured_fields: IntakeField::ALL
                .iter()
                .copied()
                .filter(|field| self.record.is_filled(*field))
                .map(IntakeField::key)
                .collect(),
            missing_fields: self
                .record
                .missing_fields()
                .into_iter()
                .map(IntakeField::key)
                .collect(),
            tech_stack: self.record.tech_stack.to_vec(),
            questions_asked: self.questions.len(),
            answers_recorded: self.answers.len(),
            turns: self.history.len(),
        }
    }
}

/// Sanitized snapshot of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub phase: &'static str,
    pub captured_fields: Vec<&'static str>,
    pub missing_fields: Vec<&'static str>,
    pub tech_stack: Vec<String>,
    pub questions_asked: usize,
    pub answers_recorded: usize,
    pub turns: usize,
}

fn is_exit_command(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        let word = token
            .trim_matches(|c: char| c.is_ascii_punctuation())
            .to_lowercase();
        EXIT_KEYWORDS.contains(&word.as_str())
    })
}

fn capture_note(captured: &[FieldCandidate]) -> String {
    if captured.is_empty() {
        return String::new();
    }
    let mut parts: Vec<String> = Vec::new();
    let techs: Vec<&str> = captured
        .iter()
        .filter(|candidate| candidate.field == IntakeField::TechStack)
        .map(|candidate| candidate.value.as_str())
        .collect();
    for candidate in captured {
        if candidate.field == IntakeField::TechStack {
            continue;
        }
        parts.push(format!(
            "noted your {} ({})",
            candidate.field.label(),
            candidate.value
        ));
    }
    if !techs.is_empty() {
        parts.push(format!("added {} to your tech stack", techs.join(", ")));
    }
    format!(" (I {}.)", parts.join(" and "))
}
