use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rb_db::schema;
use rb_db::seed::{SeedData, apply_seed};
use rb_serve::{AppState, app};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BASE: &str = "/api/sprints/1/retrospectives/1";

struct TestApp {
    _dir: TempDir,
    db_path: String,
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("retro.db").to_string_lossy().to_string();
        let conn = schema::open_and_migrate(&db_path).unwrap();
        let seed: SeedData = serde_json::from_value(json!({
            "users": [
                {"id": 1, "firstName": "Grace", "lastName": "Hopper", "email": "grace@example.com"},
                {"id": 2, "firstName": "Alan", "lastName": "Turing", "email": "alan@example.com"}
            ],
            "retrospectives": [{"id": 1, "title": "Platform", "members": [1]}],
            "sprints": [
                {"id": 1, "retrospectiveId": 1, "title": "S1", "status": "Active",
                 "startDate": "2024-03-01T00:00:00Z", "endDate": "2024-03-10T00:00:00Z"},
                {"id": 2, "retrospectiveId": 1, "title": "S2", "status": "Draft",
                 "startDate": "2024-03-11T00:00:00Z", "endDate": "2024-03-20T00:00:00Z"}
            ],
            "sprintTasks": [
                {"id": 1, "sprintId": 1, "key": "PLAT-1", "summary": "Cache warmup", "taskType": "Story", "pointsAssigned": 3.0}
            ]
        }))
        .unwrap();
        apply_seed(&conn, &seed).unwrap();
        Self { _dir: dir, db_path }
    }

    fn router(&self) -> Router {
        app(AppState::new(self.db_path.clone()))
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        user: Option<i64>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn trail_actions(&self, entity_id: &str) -> Vec<String> {
        let conn = schema::open(&self.db_path).unwrap();
        let mut stmt = conn
            .prepare("SELECT action FROM trails WHERE entity_id = ?1 ORDER BY id")
            .unwrap();
        stmt.query_map([entity_id], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }
}

#[tokio::test]
async fn create_highlight_returns_201_and_records_trail() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            &format!("{BASE}/highlights/"),
            Some(1),
            Some(r#"{"subType":"went_well","text":"Calm deploys"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "Highlight");
    assert_eq!(body["scope"], "Team");
    assert_eq!(body["addedAt"], "2024-03-01T00:00:00Z");
    assert_eq!(body["resolvedAt"], "2024-03-10T00:00:00Z");
    assert_eq!(body["createdBy"]["firstName"], "Grace");

    let id = body["id"].to_string();
    assert_eq!(app.trail_actions(&id), vec!["Added Highlight"]);

    let (status, list) = app
        .send("GET", &format!("{BASE}/highlights/"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["feedbacks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_member_is_forbidden_before_any_write() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            &format!("{BASE}/notes/"),
            Some(2),
            Some(r#"{"subType":"fyi"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({}));

    let (_, list) = app
        .send("GET", &format!("{BASE}/notes/"), Some(1), None)
        .await;
    assert!(list["feedbacks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn draft_sprint_feedback_is_forbidden() {
    let app = TestApp::new();
    let (status, _) = app
        .send("GET", "/api/sprints/2/retrospectives/1/goals/?goalType=added", Some(1), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send("POST", &format!("{BASE}/goals/"), Some(1), Some("{not json"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request data");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = TestApp::new();
    let (status, _) = app
        .send("GET", &format!("{BASE}/highlights/"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send("GET", &format!("{BASE}/tasks/"), Some(0), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_path_id_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .send("GET", "/api/sprints/abc/retrospectives/1/highlights/", Some(1), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid sprint id: abc");
}

#[tokio::test]
async fn goal_resolution_flow() {
    let app = TestApp::new();
    let (status, goal) = app
        .send(
            "POST",
            &format!("{BASE}/goals/"),
            Some(1),
            Some(r#"{"subType":"action","text":"Add alerts"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["resolvedAt"], Value::Null);
    let id = goal["id"].as_i64().unwrap();

    let (status, added) = app
        .send("GET", &format!("{BASE}/goals/?goalType=added"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["feedbacks"][0]["id"], id);

    let (status, resolved) = app
        .send("POST", &format!("{BASE}/goals/{id}/resolve/"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["resolvedAt"], "2024-03-10T00:00:00Z");

    let (status, body) = app
        .send(
            "PUT",
            &format!("{BASE}/goals/{id}/"),
            Some(1),
            Some(r#"{"text":"Add more alerts"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update goal");
    assert_eq!(body["error"], "can not update resolved goal");

    let (status, reopened) = app
        .send("DELETE", &format!("{BASE}/goals/{id}/resolve/"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["resolvedAt"], Value::Null);

    assert_eq!(
        app.trail_actions(&id.to_string()),
        vec!["Added Goal", "Resolved Goal", "Unresolved Goal"]
    );
}

#[tokio::test]
async fn unknown_goal_type_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .send("GET", &format!("{BASE}/goals/?goalType=someday"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to fetch goals");
    assert_eq!(body["error"], "invalid goal type: someday");
}

#[tokio::test]
async fn sprint_task_status_codes() {
    let app = TestApp::new();
    let (status, list) = app
        .send("GET", &format!("{BASE}/tasks/"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["tasks"][0]["key"], "PLAT-1");

    let (status, done) = app
        .send("POST", &format!("{BASE}/tasks/1/done/"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["isDone"], true);

    let (status, again) = app
        .send("POST", &format!("{BASE}/tasks/1/done/"), Some(1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["doneAt"], done["doneAt"]);

    let (status, body) = app
        .send(
            "PATCH",
            &format!("{BASE}/tasks/1/"),
            Some(1),
            Some(r#"{"rating":5}"#),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
    assert!(body["correlationId"].as_str().unwrap().starts_with("corr_"));

    let (status, _) = app
        .send("GET", &format!("{BASE}/tasks/1/"), Some(2), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn correlation_id_is_echoed() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri(format!("{BASE}/tasks/"))
        .header("x-user-id", "1")
        .header("x-correlation-id", "corr_fixed")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-correlation-id"], "corr_fixed");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();
    let (status, spec) = app.send("GET", "/api/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"].as_object().unwrap().len() >= 10);
}

#[tokio::test]
async fn update_note_returns_200_and_records_trail() {
    let app = TestApp::new();
    let (_, note) = app
        .send(
            "POST",
            &format!("{BASE}/notes/"),
            Some(1),
            Some(r#"{"subType":"fyi","text":"Holiday on Friday"}"#),
        )
        .await;
    let id = note["id"].as_i64().unwrap();

    let (status, updated) = app
        .send(
            "PUT",
            &format!("{BASE}/notes/{id}/"),
            Some(1),
            Some(r#"{"text":"Holiday on Monday","scope":"Organisation"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["type"], "Note");
    assert_eq!(updated["text"], "Holiday on Monday");
    assert_eq!(updated["scope"], "Organisation");
    assert_eq!(updated["subType"], "fyi");

    assert_eq!(
        app.trail_actions(&id.to_string()),
        vec!["Added Note", "Updated Note"]
    );
}

#[tokio::test]
async fn update_through_another_kind_route_is_rejected() {
    let app = TestApp::new();
    let (_, goal) = app
        .send(
            "POST",
            &format!("{BASE}/goals/"),
            Some(1),
            Some(r#"{"subType":"action","text":"Add alerts"}"#),
        )
        .await;
    let id = goal["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "PUT",
            &format!("{BASE}/highlights/{id}/"),
            Some(1),
            Some(r#"{"text":"edited via highlights","expectedAt":"2024-03-30T00:00:00Z"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to update highlight");
    assert_eq!(body["error"], "feedback not found");

    let (_, goals) = app
        .send("GET", &format!("{BASE}/goals/?goalType=added"), Some(1), None)
        .await;
    assert_eq!(goals["feedbacks"][0]["text"], "Add alerts");
    assert_eq!(goals["feedbacks"][0]["expectedAt"], Value::Null);
    assert_eq!(app.trail_actions(&id.to_string()), vec!["Added Goal"]);
}

#[tokio::test]
async fn forbidden_update_leaves_record_unchanged() {
    let app = TestApp::new();
    let (_, highlight) = app
        .send(
            "POST",
            &format!("{BASE}/highlights/"),
            Some(1),
            Some(r#"{"subType":"went_well","text":"Calm deploys"}"#),
        )
        .await;
    let id = highlight["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "PUT",
            &format!("{BASE}/highlights/{id}/"),
            Some(2),
            Some(r#"{"text":"Chaotic deploys"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({}));

    let (_, list) = app
        .send("GET", &format!("{BASE}/highlights/"), Some(1), None)
        .await;
    assert_eq!(list["feedbacks"][0]["text"], "Calm deploys");
    assert_eq!(app.trail_actions(&id.to_string()), vec!["Added Highlight"]);
}

#[tokio::test]
async fn expected_at_is_stored_with_microsecond_precision() {
    let app = TestApp::new();
    let (_, goal) = app
        .send(
            "POST",
            &format!("{BASE}/goals/"),
            Some(1),
            Some(r#"{"subType":"action"}"#),
        )
        .await;
    let id = goal["id"].as_i64().unwrap();

    let (status, updated) = app
        .send(
            "PUT",
            &format!("{BASE}/goals/{id}/"),
            Some(1),
            Some(r#"{"expectedAt":"2024-03-30T00:00:00.123456789Z"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["expectedAt"], "2024-03-30T00:00:00.123456Z");

    let (_, goals) = app
        .send("GET", &format!("{BASE}/goals/?goalType=added"), Some(1), None)
        .await;
    assert_eq!(goals["feedbacks"][0]["expectedAt"], updated["expectedAt"]);
}
