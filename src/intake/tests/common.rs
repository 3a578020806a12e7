use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::intake::classify::Classifier;
use crate::intake::extract::Extractor;
use crate::intake::questions::{GeneratorError, QuestionGenerator, TemplateQuestionBank};
use crate::intake::repository::{CandidateRepository, RepositoryError, StoredCandidate};
use crate::intake::router::intake_router;
use crate::intake::service::IntakeService;
use crate::intake::validate::FieldValidator;
use crate::intake::domain::{SessionId, TechStack};

pub(super) fn config() -> IntakeConfig {
    IntakeConfig::default()
}

pub(super) fn classifier() -> Classifier {
    Classifier::new(config())
}

pub(super) fn extractor() -> Extractor {
    Extractor::new(config())
}

pub(super) fn validator() -> FieldValidator {
    FieldValidator::new(config())
}

/// The seven clean intake answers, in field order.
pub(super) const CLEAN_ANSWERS: [&str; 7] = [
    "Ada Lovelace",
    "ada@example.com",
    "+1 515 555 0100",
    "6 years",
    "Backend engineer",
    "Des Moines, IA",
    "Rust, PostgreSQL",
];

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: Mutex<Vec<StoredCandidate>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<StoredCandidate> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl CandidateRepository for MemoryRepository {
    fn append(&self, record: &StoredCandidate) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredCandidate>, RepositoryError> {
        Ok(self.stored())
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn append(&self, _record: &StoredCandidate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "store offline",
        )))
    }

    fn load_all(&self) -> Result<Vec<StoredCandidate>, RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "store offline",
        )))
    }
}

/// Generator that stalls for a fixed delay before answering, for exercising
/// timeout bounding and lock granularity.
pub(super) struct SleepyGenerator {
    pub(super) delay: std::time::Duration,
}

impl QuestionGenerator for SleepyGenerator {
    fn generate(
        &self,
        _tech_stack: &TechStack,
        _experience_years: u32,
    ) -> Result<Vec<String>, GeneratorError> {
        std::thread::sleep(self.delay);
        Ok(vec!["A question that arrived late.".to_string()])
    }
}

pub(super) struct FailingGenerator;

impl QuestionGenerator for FailingGenerator {
    fn generate(
        &self,
        _tech_stack: &TechStack,
        _experience_years: u32,
    ) -> Result<Vec<String>, GeneratorError> {
        Err(GeneratorError::Unavailable("model offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<IntakeService<MemoryRepository, TemplateQuestionBank>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let generator = Arc::new(TemplateQuestionBank::new(&config()));
    let service = Arc::new(IntakeService::new(
        repository.clone(),
        generator,
        config(),
    ));
    (service, repository)
}

/// Drive a fresh session through the full intake with clean answers,
/// stopping at the technical-questions hand-off. Returns the hand-off reply.
pub(super) fn complete_intake(
    service: &IntakeService<MemoryRepository, TemplateQuestionBank>,
    session_id: &SessionId,
) -> String {
    let mut last = String::new();
    for answer in CLEAN_ANSWERS {
        last = service.turn(session_id, answer).expect("turn succeeds");
    }
    last
}

pub(super) fn intake_router_with_service(
    service: Arc<IntakeService<MemoryRepository, TemplateQuestionBank>>,
) -> axum::Router {
    intake_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
