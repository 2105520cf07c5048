use utoipa::OpenApi;

use crate::routes::error::{ErrorEnvelope, FeedbackFailure};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use rb_core::types::enums::{FeedbackScope, FeedbackType, GoalView, SprintStatus};
use rb_core::types::feedback::{Feedback, FeedbackList};
use rb_core::types::ids::{FeedbackId, RetrospectiveId, SprintId, SprintTaskId, UserId};
use rb_core::types::io::{
    CreateFeedbackInput, GoalListQuery, UpdateFeedbackInput, UpdateSprintTaskInput,
};
use rb_core::types::sprint_task::{SprintTask, SprintTaskList};
use rb_core::types::user::UserSummary;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::highlights::add_highlight,
        crate::routes::highlights::list_highlights,
        crate::routes::highlights::update_highlight,
        crate::routes::notes::add_note,
        crate::routes::notes::list_notes,
        crate::routes::notes::update_note,
        crate::routes::goals::add_goal,
        crate::routes::goals::list_goals,
        crate::routes::goals::update_goal,
        crate::routes::goals::resolve_goal,
        crate::routes::goals::unresolve_goal,
        crate::routes::sprint_tasks::list_tasks,
        crate::routes::sprint_tasks::get_task,
        crate::routes::sprint_tasks::update_task,
        crate::routes::sprint_tasks::mark_done,
        crate::routes::sprint_tasks::mark_undone
    ),
    components(schemas(
        Feedback,
        FeedbackList,
        CreateFeedbackInput,
        UpdateFeedbackInput,
        GoalListQuery,
        SprintTask,
        SprintTaskList,
        UpdateSprintTaskInput,
        UserSummary,
        FeedbackFailure,
        ErrorEnvelope,
        FeedbackType,
        FeedbackScope,
        SprintStatus,
        GoalView,
        UserId,
        RetrospectiveId,
        SprintId,
        FeedbackId,
        SprintTaskId
    ))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> impl IntoResponse {
    Html(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Retroboard API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
      window.ui = SwaggerUIBundle({ url: '/api/openapi.json', dom_id: '#swagger-ui' });
    </script>
  </body>
</html>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec: serde_json::Value = serde_json::from_str(&generate_spec()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        let base = "/api/sprints/{sprint_id}/retrospectives/{retro_id}";
        for suffix in [
            "/highlights/",
            "/highlights/{id}/",
            "/notes/",
            "/notes/{id}/",
            "/goals/",
            "/goals/{id}/",
            "/goals/{id}/resolve/",
            "/tasks/",
            "/tasks/{id}/",
            "/tasks/{id}/done/",
        ] {
            let path = format!("{base}{suffix}");
            assert!(paths.contains_key(&path), "missing {path}");
        }
    }
}
