use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{QuestionAnswer, SessionId, Turn};
use super::sentiment::Sentiment;

/// Finalized intake record written once per completed session. The top-level
/// keys match the required intake fields exactly, plus the recorded Q&A pairs
/// and the session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCandidate {
    pub session_id: SessionId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub years_experience: u32,
    pub desired_position: String,
    pub location: String,
    pub tech_stack: Vec<String>,
    pub tech_questions_and_answers: Vec<QuestionAnswer>,
    pub transcript: Vec<Turn>,
    pub sentiment_history: Vec<Sentiment>,
    pub completed_at: DateTime<Utc>,
}

impl StoredCandidate {
    /// Human-facing summary with contact details masked: only the first three
    /// characters of the email local part and the last four phone digits.
    pub fn masked_summary(&self) -> String {
        let mut lines = vec![format!("Name: {}", self.full_name)];

        match self.email.split_once('@') {
            Some((local, domain)) => {
                let visible: String = local.chars().take(3).collect();
                lines.push(format!("Email: {visible}...@{domain}"));
            }
            None => lines.push(format!("Email: {}", self.email)),
        }

        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        let tail: String = digits
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        lines.push(format!("Phone: ****-****-{tail}"));

        lines.push(format!("Experience: {} years", self.years_experience));
        lines.push(format!("Position: {}", self.desired_position));
        lines.push(format!("Location: {}", self.location));
        lines.push(format!("Tech stack: {}", self.tech_stack.join(", ")));
        lines.join("\n")
    }
}

/// Storage abstraction so the intake service can be exercised in isolation.
pub trait CandidateRepository: Send + Sync {
    fn append(&self, record: &StoredCandidate) -> Result<(), RepositoryError>;
    fn load_all(&self) -> Result<Vec<StoredCandidate>, RepositoryError>;
}

/// Error enumeration for persistence failures. Persistence is a best-effort
/// collaborator: callers log these and still report intake completion.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("candidate store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt candidate record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Append-only JSON Lines store, one candidate object per line.
pub struct JsonlCandidateRepository {
    path: PathBuf,
    // Serializes appends from concurrent sessions to keep lines whole.
    write_lock: Mutex<()>,
}

impl JsonlCandidateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

impl CandidateRepository for JsonlCandidateRepository {
    fn append(&self, record: &StoredCandidate) -> Result<(), RepositoryError> {
        let line = serde_json::to_string(record)?;
        let _guard = self.write_lock.lock().expect("candidate store lock poisoned");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredCandidate>, RepositoryError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredCandidate {
        StoredCandidate {
            session_id: SessionId("sess-000001".to_string()),
            full_name: "Ada Lovelace".to_string(),
            email: "ada.lovelace@example.com".to_string(),
            phone: "5155550100".to_string(),
            years_experience: 6,
            desired_position: "Backend engineer".to_string(),
            location: "Des Moines, IA".to_string(),
            tech_stack: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            tech_questions_and_answers: vec![QuestionAnswer {
                question: "What are the main features and benefits of Rust?".to_string(),
                answer: "Ownership and fearless concurrency.".to_string(),
            }],
            transcript: Vec::new(),
            sentiment_history: vec![Sentiment::Neutral],
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn masked_summary_hides_contact_details() {
        let summary = sample().masked_summary();
        assert!(summary.contains("ada...@example.com"));
        assert!(summary.contains("****-****-0100"));
        assert!(!summary.contains("5155550100"));
        assert!(summary.contains("Rust, PostgreSQL"));
    }

    #[test]
    fn serialized_record_carries_the_required_keys() {
        let value = serde_json::to_value(sample()).expect("serializes");
        for key in [
            "full_name",
            "email",
            "phone",
            "years_experience",
            "desired_position",
            "location",
            "tech_stack",
            "tech_questions_and_answers",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn jsonl_round_trips_appended_records() {
        let dir = std::env::temp_dir().join(format!(
            "talentscout-repo-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("candidates.jsonl");
        let _ = std::fs::remove_file(&path);

        let repository = JsonlCandidateRepository::new(&path);
        assert!(repository.load_all().expect("empty load").is_empty());

        repository.append(&sample()).expect("append");
        repository.append(&sample()).expect("append");

        let records = repository.load_all().expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_name, "Ada Lovelace");

        let _ = std::fs::remove_file(&path);
    }
}
