use std::sync::LazyLock;

use regex::Regex;

use super::classify;
use super::domain::IntakeField;
use crate::config::IntakeConfig;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("number pattern"));

/// Field-level rejection reasons. All of these are recoverable: the state
/// machine answers them with a re-prompt, never a session failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no {0} provided")]
    Empty(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("a phone number needs 7 to 15 digits, got {0}")]
    InvalidPhoneLength(usize),
    #[error("phone numbers may only contain digits and separators")]
    InvalidPhoneCharacters,
    #[error("a name needs at least one alphabetic word")]
    InvalidName,
    #[error("years of experience must be a number between 0 and 60")]
    InvalidExperience,
    #[error("that looks like pasted text rather than a {0}")]
    LooksPasted(&'static str),
}

/// Deterministic, side-effect-free syntactic validation for every intake
/// field. Holds the heuristics thresholds so the free-text checks agree with
/// the classifier.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    config: IntakeConfig,
}

impl FieldValidator {
    pub fn new(config: IntakeConfig) -> Self {
        Self { config }
    }

    /// Validate a raw value for a field, returning the normalized value to
    /// store. Same input always yields the same verdict.
    pub fn validate(&self, field: IntakeField, raw: &str) -> Result<String, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty(field.label()));
        }

        match field {
            IntakeField::FullName => self.validate_name(trimmed),
            IntakeField::Email => validate_email(trimmed),
            IntakeField::Phone => validate_phone(trimmed),
            IntakeField::YearsExperience => validate_experience(trimmed),
            IntakeField::DesiredPosition | IntakeField::Location => {
                self.validate_free_text(field, trimmed)
            }
            IntakeField::TechStack => validate_tech_stack(trimmed),
        }
    }

    fn validate_name(&self, trimmed: &str) -> Result<String, ValidationError> {
        if trimmed.chars().count() < 2 {
            return Err(ValidationError::InvalidName);
        }
        let has_alpha_token = trimmed
            .split_whitespace()
            .any(|token| token.chars().any(|c| c.is_alphabetic()));
        if !has_alpha_token {
            return Err(ValidationError::InvalidName);
        }
        if classify::looks_repetitive(trimmed, &self.config) {
            return Err(ValidationError::LooksPasted("full name"));
        }
        Ok(collapse_whitespace(trimmed))
    }

    fn validate_free_text(
        &self,
        field: IntakeField,
        trimmed: &str,
    ) -> Result<String, ValidationError> {
        if classify::looks_repetitive(trimmed, &self.config)
            || classify::looks_like_assignment(trimmed, &self.config)
        {
            return Err(ValidationError::LooksPasted(field.label()));
        }
        Ok(collapse_whitespace(trimmed))
    }
}

fn validate_email(trimmed: &str) -> Result<String, ValidationError> {
    if EMAIL_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidEmail(trimmed.to_string()))
    }
}

fn validate_phone(trimmed: &str) -> Result<String, ValidationError> {
    let mut digits = String::new();
    for c in trimmed.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !matches!(c, ' ' | '-' | '.' | '(' | ')' | '+') {
            return Err(ValidationError::InvalidPhoneCharacters);
        }
    }
    if (7..=15).contains(&digits.len()) {
        Ok(digits)
    } else {
        Err(ValidationError::InvalidPhoneLength(digits.len()))
    }
}

fn validate_experience(trimmed: &str) -> Result<String, ValidationError> {
    let number = NUMBER_RE
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or(ValidationError::InvalidExperience)?;
    if number > 60 {
        return Err(ValidationError::InvalidExperience);
    }
    Ok(number.to_string())
}

fn validate_tech_stack(trimmed: &str) -> Result<String, ValidationError> {
    let entries: Vec<&str> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();
    if entries.is_empty() {
        return Err(ValidationError::Empty("tech stack"));
    }
    Ok(entries.join(", "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip markup and injection characters before any classification runs.
pub fn sanitize(raw: &str) -> String {
    let without_tags = HTML_TAG_RE.replace_all(raw, "");
    without_tags
        .chars()
        .filter(|c| !matches!(c, ';' | '\\' | '/'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Find the first email-shaped token inside free text, if any.
pub(crate) fn find_email(text: &str) -> Option<String> {
    static EMBEDDED_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("embedded email")
    });
    EMBEDDED_EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Find an explicit years-of-experience mention ("5 years", "3 yrs").
pub(crate) fn find_experience_mention(text: &str) -> Option<String> {
    static YEARS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").expect("years"));
    YEARS_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Find an embedded phone-shaped run of at least 7 digits with separators.
pub(crate) fn find_phone(text: &str) -> Option<String> {
    static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\+?\d[\d\s().-]{5,18}\d").expect("phone pattern")
    });
    for m in PHONE_RE.find_iter(text) {
        let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
        if (7..=15).contains(&digits.len()) {
            return Some(digits);
        }
    }
    None
}
