use crate::AppState;
use crate::middleware::correlation::CorrelationId;
use crate::middleware::identity::CurrentUser;
use crate::routes::error::FeedbackFailure;
use crate::routes::feedback::{self, FeedbackPath, RetroPath, NOTES};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{post, put};
use axum::{Extension, Json, Router};
use rb_core::types::{CreateFeedbackInput, Feedback, FeedbackList, UpdateFeedbackInput};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/notes/",
            post(add_note).get(list_notes),
        )
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/notes/{id}/",
            put(update_note),
        )
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/notes/",
    params(RetroPath),
    request_body = CreateFeedbackInput,
    responses(
        (status = 201, body = Feedback),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn add_note(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<RetroPath>,
    body: Result<Json<CreateFeedbackInput>, JsonRejection>,
) -> Response {
    feedback::add(&state, correlation, user, path, NOTES, body)
}

#[utoipa::path(
    get,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/notes/",
    params(RetroPath),
    responses(
        (status = 200, body = FeedbackList),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn list_notes(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<RetroPath>,
) -> Response {
    feedback::list(&state, correlation, user, path, NOTES)
}

#[utoipa::path(
    put,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/notes/{id}/",
    params(FeedbackPath),
    request_body = UpdateFeedbackInput,
    responses(
        (status = 200, body = Feedback),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn update_note(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<FeedbackPath>,
    body: Result<Json<UpdateFeedbackInput>, JsonRejection>,
) -> Response {
    feedback::update(&state, correlation, user, path, NOTES, body)
}
