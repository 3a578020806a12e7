use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::common::{
    build_service, complete_intake, config, FailingGenerator, MemoryRepository, SleepyGenerator,
    UnavailableRepository, CLEAN_ANSWERS,
};
use crate::intake::domain::SessionId;
use crate::intake::questions::TemplateQuestionBank;
use crate::intake::service::{IntakeService, IntakeServiceError};

#[test]
fn sessions_get_distinct_ids_and_the_greeting() {
    let (service, _repository) = build_service();
    let (first, greeting) = service.start_session();
    let (second, _) = service.start_session();

    assert_ne!(first, second);
    assert!(greeting.contains("TalentScout Hiring Assistant"));
    assert!(greeting.contains("full name"));
}

#[test]
fn turns_against_unknown_sessions_are_rejected() {
    let (service, _repository) = build_service();
    let result = service.turn(&SessionId("sess-missing".to_string()), "hello");
    assert!(matches!(
        result,
        Err(IntakeServiceError::UnknownSession(_))
    ));
}

#[test]
fn a_full_conversation_persists_the_candidate_record() {
    let (service, repository) = build_service();
    let (session_id, _) = service.start_session();

    let hand_off = complete_intake(&service, &session_id);
    assert!(hand_off.contains("Question 1:"));
    assert!(hand_off.contains("Rust, PostgreSQL"));

    let mut reply = String::new();
    for answer in [
        "Ownership rules out data races at compile time.",
        "I tracked down lock contention in a job queue.",
        "Clippy and exhaustive matching.",
        "Indexes and EXPLAIN plans.",
        "Reading release notes and spiking.",
    ] {
        reply = service.turn(&session_id, answer).expect("answer accepted");
    }
    assert!(reply.contains("recorded"));

    let stored = repository.stored();
    assert_eq!(stored.len(), 1);
    let record = &stored[0];
    assert_eq!(record.full_name, "Ada Lovelace");
    assert_eq!(record.email, "ada@example.com");
    assert_eq!(record.years_experience, 6);
    assert_eq!(record.tech_stack, vec!["Rust", "PostgreSQL"]);
    assert_eq!(record.tech_questions_and_answers.len(), 5);
    assert!(record.transcript.len() > 10);
}

#[test]
fn an_early_exit_persists_nothing() {
    let (service, repository) = build_service();
    let (session_id, _) = service.start_session();

    service.turn(&session_id, CLEAN_ANSWERS[0]).expect("turn");
    let farewell = service.turn(&session_id, "quit").expect("turn");

    assert!(farewell.contains("Have a great day"));
    assert!(repository.stored().is_empty());
}

#[test]
fn a_failing_generator_degrades_to_template_questions() {
    let repository = Arc::new(MemoryRepository::default());
    let service = IntakeService::new(repository, Arc::new(FailingGenerator), config());
    let (session_id, _) = service.start_session();

    let mut hand_off = String::new();
    for answer in CLEAN_ANSWERS {
        hand_off = service.turn(&session_id, answer).expect("turn");
    }

    assert!(hand_off.contains("Question 1:"));
    assert!(hand_off.contains("Rust"));
}

#[test]
fn the_configured_timeout_bounds_a_slow_generator() {
    let mut config = config();
    config.generator_timeout = Duration::from_millis(30);
    let repository = Arc::new(MemoryRepository::default());
    let service = IntakeService::new(
        repository,
        Arc::new(SleepyGenerator {
            delay: Duration::from_millis(500),
        }),
        config,
    );
    let (session_id, _) = service.start_session();

    let started = Instant::now();
    let mut hand_off = String::new();
    for answer in CLEAN_ANSWERS {
        hand_off = service.turn(&session_id, answer).expect("turn");
    }

    // The stalled attempt is abandoned at the configured bound and the
    // template bank answers instead of "A question that arrived late."
    assert!(hand_off.contains("Question 1:"));
    assert!(hand_off.contains("Rust"));
    assert!(!hand_off.contains("arrived late"));
    assert!(started.elapsed() < Duration::from_millis(400));
}

#[test]
fn a_slow_generator_in_one_session_does_not_block_another() {
    let mut config = config();
    config.generator_timeout = Duration::from_millis(2000);
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(IntakeService::new(
        repository,
        Arc::new(SleepyGenerator {
            delay: Duration::from_millis(1000),
        }),
        config,
    ));
    let (busy, _) = service.start_session();
    let (idle, _) = service.start_session();

    let worker = {
        let service = Arc::clone(&service);
        let busy = busy.clone();
        thread::spawn(move || {
            for answer in CLEAN_ANSWERS {
                service.turn(&busy, answer).expect("turn");
            }
        })
    };

    // Let the worker reach the generator call, then read the other session.
    thread::sleep(Duration::from_millis(200));
    let started = Instant::now();
    let view = service.session_view(&idle).expect("view");
    assert!(
        started.elapsed() < Duration::from_millis(300),
        "view of an idle session blocked for {:?}",
        started.elapsed()
    );
    assert_eq!(view.phase, "full_name");

    worker.join().expect("worker thread");
}

#[test]
fn a_broken_store_still_completes_the_conversation() {
    let repository = Arc::new(UnavailableRepository);
    let generator = Arc::new(TemplateQuestionBank::new(&config()));
    let service = IntakeService::new(repository, generator, config());
    let (session_id, _) = service.start_session();

    for answer in CLEAN_ANSWERS {
        service.turn(&session_id, answer).expect("turn");
    }

    let mut reply = String::new();
    for _ in 0..5 {
        reply = service
            .turn(&session_id, "A considered answer.")
            .expect("answer accepted");
    }
    assert!(reply.contains("trouble saving your responses"));
}

#[test]
fn the_session_view_tracks_progress() {
    let (service, _repository) = build_service();
    let (session_id, _) = service.start_session();

    service.turn(&session_id, "Ada Lovelace").expect("turn");
    let view = service.session_view(&session_id).expect("view");

    assert_eq!(view.session_id, session_id);
    assert_eq!(view.phase, "email");
    assert_eq!(view.captured_fields, vec!["full_name"]);
    assert_eq!(view.answers_recorded, 0);
}
