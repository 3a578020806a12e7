use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::SessionId;
use super::questions::QuestionGenerator;
use super::repository::CandidateRepository;
use super::service::{IntakeService, IntakeServiceError};

/// Router builder exposing HTTP endpoints for the intake conversation.
pub fn intake_router<R, G>(service: Arc<IntakeService<R, G>>) -> Router
where
    R: CandidateRepository + 'static,
    G: QuestionGenerator + 'static,
{
    Router::new()
        .route("/api/v1/intake/sessions", post(start_handler::<R, G>))
        .route(
            "/api/v1/intake/sessions/:session_id/turns",
            post(turn_handler::<R, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id",
            get(view_handler::<R, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TurnRequest {
    pub message: String,
}

pub(crate) async fn start_handler<R, G>(
    State(service): State<Arc<IntakeService<R, G>>>,
) -> Response
where
    R: CandidateRepository + 'static,
    G: QuestionGenerator + 'static,
{
    let (session_id, greeting) = service.start_session();
    let payload = json!({
        "session_id": session_id.0,
        "reply": greeting,
    });
    (StatusCode::CREATED, axum::Json(payload)).into_response()
}

pub(crate) async fn turn_handler<R, G>(
    State(service): State<Arc<IntakeService<R, G>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<TurnRequest>,
) -> Response
where
    R: CandidateRepository + 'static,
    G: QuestionGenerator + 'static,
{
    let id = SessionId(session_id);
    match service.turn(&id, &request.message) {
        Ok(reply) => {
            let payload = json!({
                "session_id": id.0,
                "reply": reply,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(IntakeServiceError::UnknownSession(_)) => {
            let payload = json!({
                "error": format!("unknown session {}", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn view_handler<R, G>(
    State(service): State<Arc<IntakeService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    G: QuestionGenerator + 'static,
{
    let id = SessionId(session_id);
    match service.session_view(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(IntakeServiceError::UnknownSession(_)) => {
            let payload = json!({
                "error": format!("unknown session {}", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
