use std::collections::BTreeMap;
use std::io;

use serde::Serialize;

use super::domain::ExperienceLevel;
use super::repository::StoredCandidate;
use super::sentiment::Sentiment;

/// Aggregate view over persisted candidate records, the batch counterpart to
/// the live intake flow: which technologies show up, how senior the pool is,
/// and how interviews felt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeReport {
    pub total_candidates: usize,
    pub technology_counts: Vec<TechnologyCount>,
    pub experience_levels: BTreeMap<ExperienceLevel, usize>,
    pub sentiment_totals: SentimentTotals,
    pub average_answers: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyCount {
    pub technology: String,
    pub candidates: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTotals {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl IntakeReport {
    pub fn build(records: &[StoredCandidate]) -> Self {
        let mut tech_counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
        let mut experience_levels: BTreeMap<ExperienceLevel, usize> = BTreeMap::new();
        let mut sentiment_totals = SentimentTotals::default();
        let mut total_answers = 0usize;

        for record in records {
            for tech in &record.tech_stack {
                let entry = tech_counts
                    .entry(tech.to_lowercase())
                    .or_insert_with(|| (tech.clone(), 0));
                entry.1 += 1;
            }

            *experience_levels
                .entry(ExperienceLevel::from_years(record.years_experience))
                .or_insert(0) += 1;

            for sentiment in &record.sentiment_history {
                match sentiment {
                    Sentiment::Positive => sentiment_totals.positive += 1,
                    Sentiment::Negative => sentiment_totals.negative += 1,
                    Sentiment::Neutral => sentiment_totals.neutral += 1,
                }
            }

            total_answers += record.tech_questions_and_answers.len();
        }

        let mut technology_counts: Vec<TechnologyCount> = tech_counts
            .into_values()
            .map(|(technology, candidates)| TechnologyCount {
                technology,
                candidates,
            })
            .collect();
        technology_counts.sort_by(|a, b| {
            b.candidates
                .cmp(&a.candidates)
                .then_with(|| a.technology.cmp(&b.technology))
        });

        let average_answers = if records.is_empty() {
            0.0
        } else {
            total_answers as f32 / records.len() as f32
        };

        Self {
            total_candidates: records.len(),
            technology_counts,
            experience_levels,
            sentiment_totals,
            average_answers,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Candidates screened: {}\n", self.total_candidates));

        out.push_str("\nExperience levels\n");
        if self.experience_levels.is_empty() {
            out.push_str("- none\n");
        }
        for (level, count) in &self.experience_levels {
            out.push_str(&format!("- {}: {}\n", level.label(), count));
        }

        out.push_str("\nTechnology mentions\n");
        if self.technology_counts.is_empty() {
            out.push_str("- none\n");
        }
        for entry in &self.technology_counts {
            out.push_str(&format!(
                "- {}: {} candidate(s)\n",
                entry.technology, entry.candidates
            ));
        }

        let sentiments = self.sentiment_totals;
        let total = sentiments.positive + sentiments.negative + sentiments.neutral;
        out.push_str("\nSentiment across turns\n");
        if total == 0 {
            out.push_str("- no turns recorded\n");
        } else {
            out.push_str(&format!(
                "- positive {:.0}%, negative {:.0}%, neutral {:.0}%\n",
                100.0 * sentiments.positive as f32 / total as f32,
                100.0 * sentiments.negative as f32 / total as f32,
                100.0 * sentiments.neutral as f32 / total as f32,
            ));
        }

        out.push_str(&format!(
            "\nAverage technical answers per candidate: {:.1}\n",
            self.average_answers
        ));
        out
    }
}

/// Console roster with contact details masked, one block per candidate.
pub fn masked_roster(records: &[StoredCandidate]) -> String {
    records
        .iter()
        .map(StoredCandidate::masked_summary)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Per-candidate CSV export for spreadsheet review.
pub fn export_csv<W: io::Write>(
    records: &[StoredCandidate],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "session_id",
        "full_name",
        "years_experience",
        "experience_level",
        "desired_position",
        "location",
        "tech_stack",
        "answers_recorded",
        "dominant_sentiment",
    ])?;

    for record in records {
        let level = ExperienceLevel::from_years(record.years_experience);
        csv_writer.write_record([
            record.session_id.0.as_str(),
            record.full_name.as_str(),
            &record.years_experience.to_string(),
            level.label(),
            record.desired_position.as_str(),
            record.location.as_str(),
            &record.tech_stack.join("; "),
            &record.tech_questions_and_answers.len().to_string(),
            dominant_sentiment(&record.sentiment_history).label(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn dominant_sentiment(history: &[Sentiment]) -> Sentiment {
    let mut totals = SentimentTotals::default();
    for sentiment in history {
        match sentiment {
            Sentiment::Positive => totals.positive += 1,
            Sentiment::Negative => totals.negative += 1,
            Sentiment::Neutral => totals.neutral += 1,
        }
    }
    if totals.positive > totals.negative && totals.positive > totals.neutral {
        Sentiment::Positive
    } else if totals.negative > totals.positive && totals.negative > totals.neutral {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
