use crate::{AppState, build_board};
use crate::middleware::correlation::CorrelationId;
use crate::middleware::identity::CurrentUser;
use crate::routes::error::{FeedbackFailure, failure, forbidden, invalid_request, map_error};
use crate::routes::feedback::{self, FeedbackPath, GOALS, RetroPath, TRAIL_ENTITY};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Extension, Json, Router};
use rb_core::error::FeedbackError;
use rb_core::types::{
    CreateFeedbackInput, Feedback, FeedbackList, GoalListQuery, GoalView, UpdateFeedbackInput,
};
use rb_core::{PermissionService, TrailService};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/goals/",
            post(add_goal).get(list_goals),
        )
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/goals/{id}/",
            put(update_goal),
        )
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/goals/{id}/resolve/",
            post(resolve_goal).delete(unresolve_goal),
        )
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/goals/",
    params(RetroPath),
    request_body = CreateFeedbackInput,
    responses(
        (status = 201, body = Feedback),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn add_goal(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<RetroPath>,
    body: Result<Json<CreateFeedbackInput>, JsonRejection>,
) -> Response {
    feedback::add(&state, correlation, user, path, GOALS, body)
}

#[utoipa::path(
    get,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/goals/",
    params(RetroPath, GoalListQuery),
    responses(
        (status = 200, body = FeedbackList),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn list_goals(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    CurrentUser(user_id): CurrentUser,
    Path(path): Path<RetroPath>,
    query: Result<Query<GoalListQuery>, QueryRejection>,
) -> Response {
    let (sprint_id, retro_id) = match path.ids() {
        Ok(ids) => ids,
        Err(err) => return invalid_request(err),
    };
    let board = match build_board(&state) {
        Ok(board) => board,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };

    let permissions = board.permissions();
    if !permissions.can_access_retrospective_feedback(sprint_id)
        || !permissions.user_can_access_sprint(retro_id, sprint_id, user_id)
    {
        return forbidden();
    }

    // A missing goalType is reported like an unknown one.
    let goal_type = query.map(|Query(query)| query.goal_type).unwrap_or_default();
    let view = match goal_type.parse::<GoalView>() {
        Ok(view) => view,
        Err(err) => return failure("Failed to fetch goals", FeedbackError::from(err)),
    };

    match board.feedback().list_goals(user_id, sprint_id, retro_id, view) {
        Ok(list) => Json(list).into_response(),
        Err(err) => failure("Failed to fetch goals", err),
    }
}

#[utoipa::path(
    put,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/goals/{id}/",
    params(FeedbackPath),
    request_body = UpdateFeedbackInput,
    responses(
        (status = 200, body = Feedback),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn update_goal(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<FeedbackPath>,
    body: Result<Json<UpdateFeedbackInput>, JsonRejection>,
) -> Response {
    feedback::update(&state, correlation, user, path, GOALS, body)
}

#[utoipa::path(
    post,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/goals/{id}/resolve/",
    params(FeedbackPath),
    responses(
        (status = 200, body = Feedback),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn resolve_goal(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<FeedbackPath>,
) -> Response {
    resolve(&state, correlation, user, path, true)
}

#[utoipa::path(
    delete,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/goals/{id}/resolve/",
    params(FeedbackPath),
    responses(
        (status = 200, body = Feedback),
        (status = 400, body = FeedbackFailure),
        (status = 403)
    )
)]
pub(crate) async fn unresolve_goal(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<FeedbackPath>,
) -> Response {
    resolve(&state, correlation, user, path, false)
}

fn resolve(
    state: &AppState,
    correlation: CorrelationId,
    CurrentUser(user_id): CurrentUser,
    path: FeedbackPath,
    mark_resolved: bool,
) -> Response {
    let (sprint_id, retro_id, goal_id) = match path.ids() {
        Ok(ids) => ids,
        Err(err) => return invalid_request(err),
    };
    let board = match build_board(state) {
        Ok(board) => board,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };

    let permissions = board.permissions();
    if !permissions.can_access_retrospective_feedback(sprint_id)
        || !permissions.user_can_edit_sprint(retro_id, sprint_id, user_id)
    {
        return forbidden();
    }

    let (action, failed) = if mark_resolved {
        ("Resolved Goal", "Failed to resolve goal")
    } else {
        ("Unresolved Goal", "Failed to unresolve goal")
    };
    match board
        .feedback()
        .resolve(user_id, sprint_id, retro_id, goal_id, mark_resolved)
    {
        Ok(goal) => {
            board.trail().add(
                action,
                TRAIL_ENTITY,
                &goal_id.to_string(),
                user_id,
                Some(correlation.0),
            );
            Json(goal).into_response()
        }
        Err(err) => failure(failed, err),
    }
}
