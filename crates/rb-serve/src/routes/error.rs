use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rb_core::error::{FeedbackError, RetroError, SprintTaskError};
use serde::Serialize;
use serde_json::json;
use std::fmt::Display;
use utoipa::ToSchema;

/// Body of feedback endpoint failures: `{message, error}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackFailure {
    pub message: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub code: &'static str,
    pub message: String,
    pub correlation_id: Option<String>,
}

pub fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({}))).into_response()
}

pub fn invalid_request(err: impl Display) -> Response {
    failure("Invalid request data", err)
}

/// Every feedback service failure is reported as 400 with the action's message.
pub fn failure(message: &str, err: impl Display) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(FeedbackFailure {
            message: message.to_string(),
            error: err.to_string(),
        }),
    )
        .into_response()
}

pub fn map_error(
    err: &RetroError,
    correlation_id: Option<String>,
) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code, message) = match err {
        RetroError::SprintTask(task) => map_sprint_task_error(task),
        RetroError::Feedback(feedback) => map_feedback_error(feedback),
        RetroError::Storage { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            err.to_string(),
        ),
    };

    (
        status,
        Json(ErrorEnvelope {
            code,
            message,
            correlation_id,
        }),
    )
}

fn map_sprint_task_error(err: &SprintTaskError) -> (StatusCode, &'static str, String) {
    match err {
        SprintTaskError::NotFound | SprintTaskError::SprintNotFound => {
            (StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        SprintTaskError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        SprintTaskError::Storage { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            err.to_string(),
        ),
    }
}

fn map_feedback_error(err: &FeedbackError) -> (StatusCode, &'static str, String) {
    match err {
        FeedbackError::NotFound | FeedbackError::SprintNotFound => {
            (StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        FeedbackError::ResolvedGoal
        | FeedbackError::ExpectedAtOnNonGoal
        | FeedbackError::NotAGoal
        | FeedbackError::InvalidGoalView { .. }
        | FeedbackError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        FeedbackError::Storage { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            err.to_string(),
        ),
    }
}
