use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let intake = IntakeConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            intake,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Tunable heuristics for the input classifier and conversation state machine.
///
/// The detection thresholds are deliberately configuration, not constants:
/// the source material never pinned exact values, so deployments can adjust
/// them without a rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeConfig {
    /// A normalized line dominating more than this share of a multi-line
    /// message marks it as a repetitive paste. Applied once the message has
    /// at least three non-empty lines.
    pub repetition_line_ratio: f32,
    /// Minimum consecutive repeats of a token sequence that count as a
    /// repetitive paste.
    pub repetition_min_runs: usize,
    /// Character length past which instruction-marked text is treated as a
    /// pasted assignment brief.
    pub assignment_length_threshold: usize,
    /// Distinct technology mentions that make long prose read as a project
    /// brief rather than a personal answer.
    pub assignment_min_tech_mentions: usize,
    /// Consecutive unresolved turns allowed per field before the session is
    /// abandoned with a terminal message.
    pub reprompt_cap: u8,
    /// Number of technical questions asked once intake completes.
    pub question_count: usize,
    /// How many technologies from the stack seed per-technology questions.
    pub question_tech_limit: usize,
    /// Upper bound on a single external question-generator attempt.
    pub generator_timeout: Duration,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            repetition_line_ratio: 0.5,
            repetition_min_runs: 3,
            assignment_length_threshold: 400,
            assignment_min_tech_mentions: 3,
            reprompt_cap: 3,
            question_count: 5,
            question_tech_limit: 3,
            generator_timeout: Duration::from_millis(2000),
        }
    }
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("INTAKE_REPETITION_LINE_RATIO") {
            config.repetition_line_ratio = parse_env("INTAKE_REPETITION_LINE_RATIO", &raw)?;
        }
        if let Ok(raw) = env::var("INTAKE_REPETITION_MIN_RUNS") {
            config.repetition_min_runs = parse_env("INTAKE_REPETITION_MIN_RUNS", &raw)?;
        }
        if let Ok(raw) = env::var("INTAKE_ASSIGNMENT_LENGTH") {
            config.assignment_length_threshold = parse_env("INTAKE_ASSIGNMENT_LENGTH", &raw)?;
        }
        if let Ok(raw) = env::var("INTAKE_ASSIGNMENT_TECH_MENTIONS") {
            config.assignment_min_tech_mentions =
                parse_env("INTAKE_ASSIGNMENT_TECH_MENTIONS", &raw)?;
        }
        if let Ok(raw) = env::var("INTAKE_REPROMPT_CAP") {
            config.reprompt_cap = parse_env("INTAKE_REPROMPT_CAP", &raw)?;
        }
        if let Ok(raw) = env::var("INTAKE_QUESTION_COUNT") {
            config.question_count = parse_env("INTAKE_QUESTION_COUNT", &raw)?;
        }
        if let Ok(raw) = env::var("INTAKE_GENERATOR_TIMEOUT_MS") {
            let millis: u64 = parse_env("INTAKE_GENERATOR_TIMEOUT_MS", &raw)?;
            config.generator_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be an IP address or 'localhost'")
            }
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value '{value}' for {key}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
