//! Shared handling for the highlight, note and goal endpoints. Each family
//! differs only in its feedback type and the nouns used in messages and trail
//! entries.

use crate::middleware::correlation::CorrelationId;
use crate::middleware::identity::CurrentUser;
use crate::routes::error::{failure, forbidden, invalid_request, map_error};
use crate::{AppState, build_board};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rb_core::types::{
    CreateFeedbackInput, FeedbackId, FeedbackType, IdError, RetrospectiveId, SprintId,
    UpdateFeedbackInput,
};
use rb_core::{PermissionService, TrailService};
use serde::Deserialize;
use utoipa::IntoParams;

pub const TRAIL_ENTITY: &str = "Retrospective Feedback";

#[derive(Debug, Clone, Copy)]
pub struct FeedbackKind {
    pub feedback_type: FeedbackType,
    pub singular: &'static str,
    pub plural: &'static str,
}

pub const HIGHLIGHTS: FeedbackKind = FeedbackKind {
    feedback_type: FeedbackType::Highlight,
    singular: "highlight",
    plural: "highlights",
};

pub const NOTES: FeedbackKind = FeedbackKind {
    feedback_type: FeedbackType::Note,
    singular: "note",
    plural: "notes",
};

pub const GOALS: FeedbackKind = FeedbackKind {
    feedback_type: FeedbackType::Goal,
    singular: "goal",
    plural: "goals",
};

impl FeedbackKind {
    fn label(&self) -> &'static str {
        self.feedback_type.label()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct RetroPath {
    /// Sprint ID
    pub sprint_id: String,
    /// Retrospective ID
    pub retro_id: String,
}

impl RetroPath {
    pub fn ids(&self) -> Result<(SprintId, RetrospectiveId), IdError> {
        Ok((
            SprintId::parse(&self.sprint_id)?,
            RetrospectiveId::parse(&self.retro_id)?,
        ))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct FeedbackPath {
    /// Sprint ID
    pub sprint_id: String,
    /// Retrospective ID
    pub retro_id: String,
    /// Feedback ID
    pub id: String,
}

impl FeedbackPath {
    pub fn ids(&self) -> Result<(SprintId, RetrospectiveId, FeedbackId), IdError> {
        Ok((
            SprintId::parse(&self.sprint_id)?,
            RetrospectiveId::parse(&self.retro_id)?,
            FeedbackId::parse(&self.id)?,
        ))
    }
}

pub(crate) fn add(
    state: &AppState,
    correlation: CorrelationId,
    CurrentUser(user_id): CurrentUser,
    path: RetroPath,
    kind: FeedbackKind,
    body: Result<Json<CreateFeedbackInput>, JsonRejection>,
) -> Response {
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    let (sprint_id, retro_id) = match path.ids() {
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

    match board
        .feedback()
        .add(user_id, sprint_id, retro_id, kind.feedback_type, input)
    {
        Ok(feedback) => {
            board.trail().add(
                &format!("Added {}", kind.label()),
                TRAIL_ENTITY,
                &feedback.id.to_string(),
                user_id,
                Some(correlation.0),
            );
            (StatusCode::CREATED, Json(feedback)).into_response()
        }
        Err(err) => failure(&format!("Failed to create {}", kind.singular), err),
    }
}

pub(crate) fn list(
    state: &AppState,
    correlation: CorrelationId,
    CurrentUser(user_id): CurrentUser,
    path: RetroPath,
    kind: FeedbackKind,
) -> Response {
    let (sprint_id, retro_id) = match path.ids() {
        Ok(ids) => ids,
        Err(err) => return invalid_request(err),
    };
    let board = match build_board(state) {
        Ok(board) => board,
        Err(err) => return map_error(&err, Some(correlation.0)).into_response(),
    };

    let permissions = board.permissions();
    if !permissions.can_access_retrospective_feedback(sprint_id)
        || !permissions.user_can_access_sprint(retro_id, sprint_id, user_id)
    {
        return forbidden();
    }

    match board
        .feedback()
        .list(user_id, sprint_id, retro_id, kind.feedback_type)
    {
        Ok(list) => Json(list).into_response(),
        Err(err) => failure(&format!("Failed to fetch {}", kind.plural), err),
    }
}

pub(crate) fn update(
    state: &AppState,
    correlation: CorrelationId,
    CurrentUser(user_id): CurrentUser,
    path: FeedbackPath,
    kind: FeedbackKind,
    body: Result<Json<UpdateFeedbackInput>, JsonRejection>,
) -> Response {
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    let (sprint_id, retro_id, feedback_id) = match path.ids() {
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

    match board
        .feedback()
        .update(user_id, retro_id, kind.feedback_type, feedback_id, input)
    {
        Ok(feedback) => {
            board.trail().add(
                &format!("Updated {}", kind.label()),
                TRAIL_ENTITY,
                &feedback_id.to_string(),
                user_id,
                Some(correlation.0),
            );
            Json(feedback).into_response()
        }
        Err(err) => failure(&format!("Failed to update {}", kind.singular), err),
    }
}
