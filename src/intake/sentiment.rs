use serde::{Deserialize, Serialize};

/// Coarse keyword sentiment tag recorded per candidate turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "good",
    "excellent",
    "amazing",
    "love",
    "enjoy",
    "passionate",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "difficult",
    "hard",
    "problem",
    "issue",
    "challenging",
];

/// Count keyword hits on whole lowercased words; ties are neutral.
pub fn analyze(text: &str) -> Sentiment {
    let mut positive = 0usize;
    let mut negative = 0usize;
    for token in text.split_whitespace() {
        let word = token
            .trim_matches(|c: char| c.is_ascii_punctuation())
            .to_lowercase();
        if POSITIVE_WORDS.contains(&word.as_str()) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(&word.as_str()) {
            negative += 1;
        }
    }
    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
