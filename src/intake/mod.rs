//! Candidate intake workflow: input classification, value extraction, and
//! the conversation state machine that drives a screening session from the
//! first greeting through technical questions to a persisted record.

pub mod classify;
pub mod domain;
pub mod extract;
pub mod questions;
pub mod report;
pub mod repository;
pub mod router;
pub mod sentiment;
pub mod service;
pub mod session;
pub mod validate;
pub mod vocabulary;

#[cfg(test)]
mod tests;

pub use classify::{ClassificationResult, Classifier, Evidence, FieldCandidate, InputLabel};
pub use domain::{
    CandidateRecord, ExperienceLevel, IntakeField, QuestionAnswer, SessionId, Speaker, TechStack,
    Turn,
};
pub use extract::Extractor;
pub use questions::{GeneratorError, QuestionGenerator, TemplateQuestionBank, TimeoutGenerator};
pub use report::{export_csv, masked_roster, IntakeReport};
pub use repository::{
    CandidateRepository, JsonlCandidateRepository, RepositoryError, StoredCandidate,
};
pub use router::intake_router;
pub use sentiment::Sentiment;
pub use service::{IntakeService, IntakeServiceError};
pub use session::{ConversationPhase, ConversationState, SessionView, TurnStep};
pub use validate::{sanitize, FieldValidator, ValidationError};
pub use vocabulary::TechVocabulary;
