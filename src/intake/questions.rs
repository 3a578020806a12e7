use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use super::domain::TechStack;
use crate::config::IntakeConfig;

/// External collaborator that produces technical questions from the
/// finalized tech stack and experience. Implementations must be cheap to
/// call once per session; the service invokes them a single time when intake
/// completes.
pub trait QuestionGenerator: Send + Sync {
    fn generate(
        &self,
        tech_stack: &TechStack,
        experience_years: u32,
    ) -> Result<Vec<String>, GeneratorError>;
}

/// Failure of an external question source. Never surfaced to the candidate:
/// callers fall back to the template bank.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("question generator unavailable: {0}")]
    Unavailable(String),
    #[error("question generator timed out after {0:?}")]
    TimedOut(Duration),
    #[error("question generator returned no questions")]
    EmptyResponse,
}

/// Deterministic template-based question selection. Serves both as the
/// default generator and as the degraded mode when an external generator
/// fails or times out.
#[derive(Debug, Clone)]
pub struct TemplateQuestionBank {
    question_count: usize,
    tech_limit: usize,
}

impl TemplateQuestionBank {
    pub fn new(config: &IntakeConfig) -> Self {
        Self {
            question_count: config.question_count,
            tech_limit: config.question_tech_limit,
        }
    }

    fn questions_for(&self, tech_stack: &TechStack) -> Vec<String> {
        let mut questions = Vec::new();
        for tech in tech_stack.iter().take(self.tech_limit) {
            questions.push(format!(
                "What are the main features and benefits of {tech}?"
            ));
            questions.push(format!(
                "Can you describe a challenging problem you solved using {tech}?"
            ));
            questions.push(format!(
                "What are some best practices when working with {tech}?"
            ));
        }
        questions.push("How do you approach learning new technologies?".to_string());
        questions.push("How do you ensure code quality in your projects?".to_string());
        questions.truncate(self.question_count.max(1));
        questions
    }
}

impl QuestionGenerator for TemplateQuestionBank {
    fn generate(
        &self,
        tech_stack: &TechStack,
        _experience_years: u32,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(self.questions_for(tech_stack))
    }
}

/// Bounds a possibly slow external generator to a single attempt within a
/// timeout, then degrades to the template bank. The returned sequence is
/// always non-empty.
pub struct TimeoutGenerator<G> {
    inner: Arc<G>,
    fallback: TemplateQuestionBank,
    timeout: Duration,
}

impl<G> TimeoutGenerator<G>
where
    G: QuestionGenerator + 'static,
{
    pub fn new(inner: Arc<G>, fallback: TemplateQuestionBank, timeout: Duration) -> Self {
        Self {
            inner,
            fallback,
            timeout,
        }
    }

    /// Wrap a generator using the configured attempt timeout, with the
    /// template bank as the degraded mode.
    pub fn from_config(inner: Arc<G>, config: &IntakeConfig) -> Self {
        Self::new(
            inner,
            TemplateQuestionBank::new(config),
            config.generator_timeout,
        )
    }

    fn attempt(
        &self,
        tech_stack: &TechStack,
        experience_years: u32,
    ) -> Result<Vec<String>, GeneratorError> {
        let (sender, receiver) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let stack = tech_stack.clone();

        // One attempt on a detached worker; an overrun thread finishes into a
        // dropped channel.
        thread::spawn(move || {
            let result = inner.generate(&stack, experience_years);
            let _ = sender.send(result);
        });

        match receiver.recv_timeout(self.timeout) {
            Ok(Ok(questions)) if questions.is_empty() => Err(GeneratorError::EmptyResponse),
            Ok(result) => result,
            Err(_) => Err(GeneratorError::TimedOut(self.timeout)),
        }
    }
}

impl<G> QuestionGenerator for TimeoutGenerator<G>
where
    G: QuestionGenerator + 'static,
{
    fn generate(
        &self,
        tech_stack: &TechStack,
        experience_years: u32,
    ) -> Result<Vec<String>, GeneratorError> {
        match self.attempt(tech_stack, experience_years) {
            Ok(questions) => Ok(questions),
            Err(error) => {
                warn!(%error, "question generator failed, using template bank");
                self.fallback.generate(tech_stack, experience_years)
            }
        }
    }
}
