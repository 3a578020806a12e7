use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use super::classify::Classifier;
use super::domain::SessionId;
use super::extract::Extractor;
use super::questions::{QuestionGenerator, TimeoutGenerator};
use super::repository::{CandidateRepository, RepositoryError, StoredCandidate};
use super::session::{ConversationState, SessionView, TurnStep};
use super::validate::FieldValidator;
use crate::config::IntakeConfig;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("sess-{id:06}"))
}

/// Service composing the classifier, extractor, state machine, question
/// generator, and candidate store. Each session carries its own lock; the
/// map mutex only guards lookup and insertion, so a slow question generator
/// in one session never stalls turns or views on another.
pub struct IntakeService<R, G> {
    config: IntakeConfig,
    classifier: Classifier,
    extractor: Extractor,
    validator: FieldValidator,
    repository: Arc<R>,
    generator: TimeoutGenerator<G>,
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<ConversationState>>>>,
}

impl<R, G> IntakeService<R, G>
where
    R: CandidateRepository + 'static,
    G: QuestionGenerator + 'static,
{
    pub fn new(repository: Arc<R>, generator: Arc<G>, config: IntakeConfig) -> Self {
        Self {
            classifier: Classifier::new(config.clone()),
            extractor: Extractor::new(config.clone()),
            validator: FieldValidator::new(config.clone()),
            repository,
            generator: TimeoutGenerator::from_config(generator, &config),
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Open a session and return its greeting.
    pub fn start_session(&self) -> (SessionId, String) {
        let id = next_session_id();
        let state = Arc::new(Mutex::new(ConversationState::new(id.clone())));
        self.sessions
            .lock()
            .expect("session map poisoned")
            .insert(id.clone(), state);
        info!(session = %id.0, "intake session started");
        (id, ConversationState::greeting().to_string())
    }

    /// Advance one session by one raw candidate message, returning the
    /// assistant reply for that turn.
    pub fn turn(&self, session_id: &SessionId, raw: &str) -> Result<String, IntakeServiceError> {
        let session = self.lookup(session_id)?;
        let mut state = session.lock().expect("session state poisoned");

        let step = state.handle_turn(
            raw,
            &self.classifier,
            &self.extractor,
            &self.validator,
            &self.config,
        );

        match step {
            TurnStep::Reply(reply) => Ok(reply),
            TurnStep::ReadyForQuestions => {
                let record = state.record();
                let years = record.years_experience.unwrap_or(0);
                // The generator is timeout-bounded and degrades to the
                // template bank internally, so this only guards the
                // impossible empty case.
                let questions = match self.generator.generate(&record.tech_stack, years) {
                    Ok(questions) if !questions.is_empty() => questions,
                    Ok(_) | Err(_) => {
                        warn!(session = %session_id.0, "generator produced nothing, asking a general question");
                        vec!["How do you approach learning new technologies?".to_string()]
                    }
                };
                Ok(state.begin_questions(questions))
            }
            TurnStep::Completed { farewell } => {
                let stored = build_stored_candidate(&state);
                match stored {
                    Some(record) => match self.repository.append(&record) {
                        Ok(()) => {
                            info!(session = %session_id.0, "candidate record persisted");
                            Ok(farewell)
                        }
                        Err(error) => {
                            // Persistence is best-effort: the candidate still
                            // hears that their intake completed.
                            warn!(session = %session_id.0, %error, "failed to persist candidate record");
                            Ok(format!(
                                "{farewell}\n(Note: we had trouble saving your responses just now; a recruiter will follow up to confirm them.)"
                            ))
                        }
                    },
                    None => {
                        warn!(session = %session_id.0, "completed session with incomplete record");
                        Ok(farewell)
                    }
                }
            }
            TurnStep::Ended { farewell } => {
                info!(session = %session_id.0, "intake session ended");
                Ok(farewell)
            }
        }
    }

    pub fn session_view(&self, session_id: &SessionId) -> Result<SessionView, IntakeServiceError> {
        let session = self.lookup(session_id)?;
        let state = session.lock().expect("session state poisoned");
        Ok(state.view())
    }

    fn lookup(
        &self,
        session_id: &SessionId,
    ) -> Result<Arc<Mutex<ConversationState>>, IntakeServiceError> {
        let sessions = self.sessions.lock().expect("session map poisoned");
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| IntakeServiceError::UnknownSession(session_id.clone()))
    }
}

fn build_stored_candidate(state: &ConversationState) -> Option<StoredCandidate> {
    let record = state.record();
    Some(StoredCandidate {
        session_id: state.id().clone(),
        full_name: record.full_name.clone()?,
        email: record.email.clone()?,
        phone: record.phone.clone()?,
        years_experience: record.years_experience?,
        desired_position: record.desired_position.clone()?,
        location: record.location.clone()?,
        tech_stack: record.tech_stack.to_vec(),
        tech_questions_and_answers: state.answers().to_vec(),
        transcript: state.history().to_vec(),
        sentiment_history: state.sentiments().to_vec(),
        completed_at: Utc::now(),
    })
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("unknown session {}", .0.0)]
    UnknownSession(SessionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
