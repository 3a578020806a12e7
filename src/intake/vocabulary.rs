/// Curated technology vocabulary used by the classifier and extractor.
///
/// Matching is whole-token and case-insensitive. Tokens are compared after
/// stripping surrounding punctuation rather than via a `\b`-anchored regex,
/// because names like `C++`, `C#`, and `Node.js` do not sit on word
/// boundaries.
#[derive(Debug, Clone)]
pub struct TechVocabulary {
    canonical: Vec<&'static str>,
    aliases: Vec<(&'static str, &'static str)>,
}

const CANONICAL: &[&str] = &[
    "Python",
    "Rust",
    "Java",
    "JavaScript",
    "TypeScript",
    "Go",
    "C",
    "C++",
    "C#",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "Scala",
    "Haskell",
    "Elixir",
    "React",
    "Angular",
    "Vue",
    "Svelte",
    "Django",
    "Flask",
    "FastAPI",
    "Rails",
    "Spring",
    "Laravel",
    "Node.js",
    "Express",
    "Next.js",
    "PostgreSQL",
    "MySQL",
    "SQLite",
    "MongoDB",
    "Redis",
    "Cassandra",
    "Elasticsearch",
    "Kafka",
    "RabbitMQ",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Ansible",
    "AWS",
    "Azure",
    "GCP",
    "Git",
    "Linux",
    "GraphQL",
    "gRPC",
    "HTML",
    "CSS",
    "Sass",
    "TensorFlow",
    "PyTorch",
    "Pandas",
    "NumPy",
    "Spark",
    "Hadoop",
    "Airflow",
    "Jenkins",
];

// Common spellings folded onto the canonical entry.
const ALIASES: &[(&str, &str)] = &[
    ("golang", "Go"),
    ("postgres", "PostgreSQL"),
    ("node", "Node.js"),
    ("nodejs", "Node.js"),
    ("nextjs", "Next.js"),
    ("reactjs", "React"),
    ("vuejs", "Vue"),
    ("k8s", "Kubernetes"),
    ("mongo", "MongoDB"),
    ("es", "Elasticsearch"),
];

impl Default for TechVocabulary {
    fn default() -> Self {
        Self {
            canonical: CANONICAL.to_vec(),
            aliases: ALIASES.to_vec(),
        }
    }
}

impl TechVocabulary {
    /// Scan free text for known technologies. Returns canonical names in
    /// first-mention order, deduplicated.
    pub fn matches(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for token in text.split_whitespace() {
            let cleaned = token.trim_matches(|c: char| {
                c.is_ascii_punctuation() && c != '+' && c != '#' && c != '.'
            });
            // A trailing period is sentence punctuation unless the token is a
            // dotted name like Node.js.
            let cleaned = if cleaned.ends_with('.') && !cleaned.to_lowercase().ends_with(".js") {
                cleaned.trim_end_matches('.')
            } else {
                cleaned
            };
            if cleaned.is_empty() {
                continue;
            }
            if let Some(name) = self.lookup(cleaned) {
                if !found.iter().any(|existing| existing == name) {
                    found.push(name.to_string());
                }
            }
        }
        found
    }

    fn lookup(&self, token: &str) -> Option<&'static str> {
        let lowered = token.to_lowercase();
        if let Some(name) = self
            .canonical
            .iter()
            .find(|name| name.to_lowercase() == lowered)
        {
            return Some(name);
        }
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, name)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive_and_whole_token() {
        let vocab = TechVocabulary::default();
        let found = vocab.matches("I mostly write python and RUST, some c++ too.");
        assert_eq!(found, vec!["Python", "Rust", "C++"]);
    }

    #[test]
    fn substrings_do_not_match() {
        let vocab = TechVocabulary::default();
        // "javan" and "pythonic" must not hit Java/Python.
        assert!(vocab.matches("a javan pythonic approach").is_empty());
    }

    #[test]
    fn aliases_fold_to_canonical_names() {
        let vocab = TechVocabulary::default();
        let found = vocab.matches("golang, postgres and nodejs");
        assert_eq!(found, vec!["Go", "PostgreSQL", "Node.js"]);
    }

    #[test]
    fn dotted_names_survive_sentence_punctuation() {
        let vocab = TechVocabulary::default();
        assert_eq!(vocab.matches("We ship Node.js."), vec!["Node.js"]);
    }

    #[test]
    fn duplicates_collapse_to_first_mention() {
        let vocab = TechVocabulary::default();
        let found = vocab.matches("Python, python, PYTHON and Rust");
        assert_eq!(found, vec!["Python", "Rust"]);
    }
}
