use crate::{AppState, build_board};
use crate::middleware::correlation::CorrelationId;
use crate::middleware::identity::CurrentUser;
use crate::routes::error::{ErrorEnvelope, forbidden, map_error};
use crate::routes::feedback::RetroPath;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use rb_core::error::{RetroError, SprintTaskError};
use rb_core::types::{
    IdError, RetrospectiveId, SprintId, SprintTask, SprintTaskId, SprintTaskList,
    UpdateSprintTaskInput,
};
use rb_core::PermissionService;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct SprintTaskPath {
    /// Sprint ID
    pub sprint_id: String,
    /// Retrospective ID
    pub retro_id: String,
    /// Sprint task ID
    pub id: String,
}

impl SprintTaskPath {
    fn ids(&self) -> Result<(SprintId, RetrospectiveId, SprintTaskId), IdError> {
        Ok((
            SprintId::parse(&self.sprint_id)?,
            RetrospectiveId::parse(&self.retro_id)?,
            SprintTaskId::parse(&self.id)?,
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/",
            get(list_tasks),
        )
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/{id}/",
            get(get_task).patch(update_task),
        )
        .route(
            "/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/{id}/done/",
            post(mark_done).delete(mark_undone),
        )
        .with_state(state)
}

fn invalid_input(err: impl std::fmt::Display, correlation: CorrelationId) -> Response {
    let err = RetroError::SprintTask(SprintTaskError::InvalidInput {
        message: err.to_string(),
    });
    map_error(&err, Some(correlation.0)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/",
    params(RetroPath),
    responses(
        (status = 200, body = SprintTaskList),
        (status = 403),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn list_tasks(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    CurrentUser(user_id): CurrentUser,
    Path(path): Path<RetroPath>,
) -> Response {
    let (sprint_id, retro_id) = match path.ids() {
        Ok(ids) => ids,
        Err(err) => return invalid_input(err, correlation),
    };
    let board = match build_board(&state) {
        Ok(board) => board,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    if !board
        .permissions()
        .user_can_access_sprint(retro_id, sprint_id, user_id)
    {
        return forbidden();
    }
    match board.sprint_tasks().list(retro_id, sprint_id) {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/{id}/",
    params(SprintTaskPath),
    responses(
        (status = 200, body = SprintTask),
        (status = 403),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn get_task(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    CurrentUser(user_id): CurrentUser,
    Path(path): Path<SprintTaskPath>,
) -> Response {
    let (sprint_id, retro_id, task_id) = match path.ids() {
        Ok(ids) => ids,
        Err(err) => return invalid_input(err, correlation),
    };
    let board = match build_board(&state) {
        Ok(board) => board,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    if !board
        .permissions()
        .user_can_access_sprint_task(retro_id, sprint_id, task_id, user_id)
    {
        return forbidden();
    }
    match board.sprint_tasks().get(task_id, retro_id, sprint_id) {
        Ok(task) => Json(task).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/{id}/",
    params(SprintTaskPath),
    request_body = UpdateSprintTaskInput,
    responses(
        (status = 200, body = SprintTask),
        (status = 400, body = ErrorEnvelope),
        (status = 403),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn update_task(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    CurrentUser(user_id): CurrentUser,
    Path(path): Path<SprintTaskPath>,
    body: Result<Json<UpdateSprintTaskInput>, JsonRejection>,
) -> Response {
    let (sprint_id, retro_id, task_id) = match path.ids() {
        Ok(ids) => ids,
        Err(err) => return invalid_input(err, correlation),
    };
    let board = match build_board(&state) {
        Ok(board) => board,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    if !board
        .permissions()
        .user_can_edit_sprint_task(retro_id, sprint_id, task_id, user_id)
    {
        return forbidden();
    }
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => return invalid_input(rejection.body_text(), correlation),
    };
    match board
        .sprint_tasks()
        .update(task_id, retro_id, sprint_id, input)
    {
        Ok(task) => Json(task).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/{id}/done/",
    params(SprintTaskPath),
    responses(
        (status = 200, body = SprintTask),
        (status = 403),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn mark_done(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<SprintTaskPath>,
) -> Response {
    set_done(&state, correlation, user, path, true)
}

#[utoipa::path(
    delete,
    path = "/api/sprints/{sprint_id}/retrospectives/{retro_id}/tasks/{id}/done/",
    params(SprintTaskPath),
    responses(
        (status = 200, body = SprintTask),
        (status = 403),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn mark_undone(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    user: CurrentUser,
    Path(path): Path<SprintTaskPath>,
) -> Response {
    set_done(&state, correlation, user, path, false)
}

fn set_done(
    state: &AppState,
    correlation: CorrelationId,
    CurrentUser(user_id): CurrentUser,
    path: SprintTaskPath,
    done: bool,
) -> Response {
    let (sprint_id, retro_id, task_id) = match path.ids() {
        Ok(ids) => ids,
        Err(err) => return invalid_input(err, correlation),
    };
    let board = match build_board(state) {
        Ok(board) => board,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };
    if !board
        .permissions()
        .user_can_edit_sprint_task(retro_id, sprint_id, task_id, user_id)
    {
        return forbidden();
    }
    let tasks = board.sprint_tasks();
    let result = if done {
        tasks.mark_done(task_id, retro_id, sprint_id)
    } else {
        tasks.mark_undone(task_id, retro_id, sprint_id)
    };
    match result {
        Ok(task) => Json(task).into_response(),
        Err(err) => map_error(&err, Some(correlation.0)).into_response(),
    }
}
