use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for screening sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// One required piece of candidate data, collected in a fixed order before
/// technical questioning begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeField {
    FullName,
    Email,
    Phone,
    YearsExperience,
    DesiredPosition,
    Location,
    TechStack,
}

impl IntakeField {
    pub const ALL: [IntakeField; 7] = [
        IntakeField::FullName,
        IntakeField::Email,
        IntakeField::Phone,
        IntakeField::YearsExperience,
        IntakeField::DesiredPosition,
        IntakeField::Location,
        IntakeField::TechStack,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            IntakeField::FullName => "full_name",
            IntakeField::Email => "email",
            IntakeField::Phone => "phone",
            IntakeField::YearsExperience => "years_experience",
            IntakeField::DesiredPosition => "desired_position",
            IntakeField::Location => "location",
            IntakeField::TechStack => "tech_stack",
        }
    }

    /// Human wording used in prompts and re-prompts.
    pub const fn label(self) -> &'static str {
        match self {
            IntakeField::FullName => "full name",
            IntakeField::Email => "email address",
            IntakeField::Phone => "phone number",
            IntakeField::YearsExperience => "years of experience",
            IntakeField::DesiredPosition => "desired position",
            IntakeField::Location => "current location",
            IntakeField::TechStack => "tech stack",
        }
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            IntakeField::FullName => "Could you please tell me your full name?",
            IntakeField::Email => "What's your email address?",
            IntakeField::Phone => "What's your phone number?",
            IntakeField::YearsExperience => {
                "How many years of experience do you have in your field?"
            }
            IntakeField::DesiredPosition => "What position(s) are you interested in?",
            IntakeField::Location => "What's your current location?",
            IntakeField::TechStack => {
                "Please list your tech stack (programming languages, frameworks, databases, tools), separated by commas:"
            }
        }
    }

    pub const fn next(self) -> Option<IntakeField> {
        match self {
            IntakeField::FullName => Some(IntakeField::Email),
            IntakeField::Email => Some(IntakeField::Phone),
            IntakeField::Phone => Some(IntakeField::YearsExperience),
            IntakeField::YearsExperience => Some(IntakeField::DesiredPosition),
            IntakeField::DesiredPosition => Some(IntakeField::Location),
            IntakeField::Location => Some(IntakeField::TechStack),
            IntakeField::TechStack => None,
        }
    }
}

/// Ordered, case-insensitively deduplicated technology list. Insertion order
/// is the order the candidate first mentioned each technology; the first-seen
/// casing is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechStack {
    entries: Vec<String>,
}

impl TechStack {
    /// Append a technology unless it is already present (case-insensitive).
    /// Returns true when the entry was new.
    pub fn push(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        let lowered = trimmed.to_lowercase();
        if self
            .entries
            .iter()
            .any(|existing| existing.to_lowercase() == lowered)
        {
            return false;
        }
        self.entries.push(trimmed.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }

    pub fn join(&self, separator: &str) -> String {
        self.entries.join(separator)
    }
}

/// Candidate data accumulated by the state machine, one field at a time.
/// A field is written at most once per session; `set` refuses overwrites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub years_experience: Option<u32>,
    pub desired_position: Option<String>,
    pub location: Option<String>,
    pub tech_stack: TechStack,
}

impl CandidateRecord {
    pub fn is_filled(&self, field: IntakeField) -> bool {
        match field {
            IntakeField::FullName => self.full_name.is_some(),
            IntakeField::Email => self.email.is_some(),
            IntakeField::Phone => self.phone.is_some(),
            IntakeField::YearsExperience => self.years_experience.is_some(),
            IntakeField::DesiredPosition => self.desired_position.is_some(),
            IntakeField::Location => self.location.is_some(),
            IntakeField::TechStack => !self.tech_stack.is_empty(),
        }
    }

    /// Store a validated value. Returns false when the field already holds an
    /// accepted value (tech stack entries append instead of conflicting).
    pub fn set(&mut self, field: IntakeField, normalized: &str) -> bool {
        if field != IntakeField::TechStack && self.is_filled(field) {
            return false;
        }
        match field {
            IntakeField::FullName => self.full_name = Some(normalized.to_string()),
            IntakeField::Email => self.email = Some(normalized.to_string()),
            IntakeField::Phone => self.phone = Some(normalized.to_string()),
            IntakeField::YearsExperience => {
                let years = normalized.parse::<u32>().ok();
                if years.is_none() {
                    return false;
                }
                self.years_experience = years;
            }
            IntakeField::DesiredPosition => self.desired_position = Some(normalized.to_string()),
            IntakeField::Location => self.location = Some(normalized.to_string()),
            IntakeField::TechStack => {
                let mut added = false;
                for entry in normalized.split(',') {
                    added |= self.tech_stack.push(entry);
                }
                return added;
            }
        }
        true
    }

    pub fn is_complete(&self) -> bool {
        IntakeField::ALL.iter().all(|field| self.is_filled(*field))
    }

    pub fn missing_fields(&self) -> Vec<IntakeField> {
        IntakeField::ALL
            .iter()
            .copied()
            .filter(|field| !self.is_filled(*field))
            .collect()
    }
}

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Assistant,
    Candidate,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn now(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// A technical question paired with the candidate's recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Coarse seniority bucket derived from years of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Junior,
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    pub fn from_years(years: u32) -> Self {
        if years < 2 {
            ExperienceLevel::Junior
        } else if years < 5 {
            ExperienceLevel::MidLevel
        } else {
            ExperienceLevel::Senior
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::MidLevel => "mid-level",
            ExperienceLevel::Senior => "senior",
        }
    }
}
