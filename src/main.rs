use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand, ValueEnum};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use talentscout::config::AppConfig;
use talentscout::error::AppError;
use talentscout::intake::{
    export_csv, intake_router, masked_roster, CandidateRepository, IntakeReport, IntakeService,
    JsonlCandidateRepository, TemplateQuestionBank,
};
use talentscout::telemetry;
use tracing::info;

const DEFAULT_STORE: &str = "candidates.jsonl";

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "TalentScout Hiring Assistant",
    about = "Run the candidate intake chatbot as an HTTP service, scripted demo, or report generator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk a scripted conversation through the real intake pipeline
    Demo(DemoArgs),
    /// Summarize persisted candidate records
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Candidate store file (JSON Lines)
    #[arg(long, default_value = DEFAULT_STORE)]
    store: PathBuf,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Which problematic-input scenario to walk through
    #[arg(long, value_enum, default_value_t = DemoScenario::BasicFlow)]
    scenario: DemoScenario,
    /// Candidate store file written when a demo completes intake
    #[arg(long, default_value = DEFAULT_STORE)]
    store: PathBuf,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Candidate store file to summarize
    #[arg(long, default_value = DEFAULT_STORE)]
    store: PathBuf,
    /// Optional CSV export path for the per-candidate table
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DemoScenario {
    /// Standard interview flow with clean answers
    BasicFlow,
    /// Repetitive pasted text handling
    RepetitiveText,
    /// Pasted assignment brief handling
    AssignmentText,
    /// Bare acknowledgment handling
    Acknowledgment,
    /// Mixed instruction-plus-data handling
    MixedInput,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Report(args) => run_report(args),
    }
}

fn build_service(
    config: &AppConfig,
    store: PathBuf,
) -> Arc<IntakeService<JsonlCandidateRepository, TemplateQuestionBank>> {
    let repository = Arc::new(JsonlCandidateRepository::new(store));
    let generator = Arc::new(TemplateQuestionBank::new(&config.intake));
    Arc::new(IntakeService::new(
        repository,
        generator,
        config.intake.clone(),
    ))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let service = build_service(&config, args.store);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(intake_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talentscout intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config, args.store);

    let script: Vec<String> = match args.scenario {
        DemoScenario::BasicFlow => [
            "Jordan Example",
            "jordan@example.com",
            "+1 (515) 555-0100",
            "6 years",
            "Backend engineer",
            "Des Moines, IA",
            "Rust, PostgreSQL, Docker",
            "Ownership prevents data races at compile time.",
            "I profiled and fixed a lock contention issue in a job queue.",
            "Clippy, exhaustive matching, and integration tests.",
            "I read release notes and build small spike projects.",
            "Code review plus CI gates on every change.",
        ]
        .map(String::from)
        .to_vec(),
        DemoScenario::RepetitiveText => [
            "Jordan Example Jordan Example Jordan Example Jordan Example Jordan Example",
            "jordan@example.com",
        ]
        .map(String::from)
        .to_vec(),
        DemoScenario::AssignmentText => vec![
            "Jordan Example".to_string(),
            "jordan@example.com".to_string(),
            "5155550100".to_string(),
            "6".to_string(),
            "Backend engineer".to_string(),
            "Des Moines".to_string(),
            assignment_paste(),
        ],
        DemoScenario::Acknowledgment => ["ok", "ok", "Jordan Example"].map(String::from).to_vec(),
        DemoScenario::MixedInput => [
            "please fill this: my email is jordan@example.com and I use Python",
            "Jordan Example",
        ]
        .map(String::from)
        .to_vec(),
    };

    let (session_id, greeting) = service.start_session();
    println!("Assistant: {greeting}\n");

    for message in &script {
        println!("Candidate: {message}\n");
        let reply = service.turn(&session_id, message)?;
        println!("Assistant: {reply}\n");
    }

    Ok(())
}

fn assignment_paste() -> String {
    let mut brief = String::from(
        "Project brief: You must implement a hiring assistant service. Requirements: \
1. The service should collect candidate details. \
2. You must write a function that validates email and phone input. \
3. The submission should include tests and documentation. ",
    );
    brief.push_str(
        "The reference implementation uses Python with Django and PostgreSQL, \
deploys on Docker, and publishes metrics. Candidates are expected to describe \
how they would extend the pipeline and keep the screening flow deterministic \
under adversarial input.",
    );
    brief
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let repository = JsonlCandidateRepository::new(&args.store);
    let records = repository.load_all()?;

    if !records.is_empty() {
        println!("{}\n", masked_roster(&records));
    }

    let report = IntakeReport::build(&records);
    println!("{}", report.render());

    if let Some(csv_path) = args.csv {
        let file = File::create(&csv_path)?;
        export_csv(&records, file)?;
        println!("CSV export written to {}", csv_path.display());
    }

    Ok(())
}
