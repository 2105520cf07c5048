use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use rb_core::types::UserId;
use serde_json::json;
use tracing::debug;

pub const HEADER_NAME: &str = "x-user-id";

/// Authenticated caller, resolved by the upstream gateway into `x-user-id`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(HEADER_NAME) else {
            return Err(unauthorized("missing caller identity"));
        };
        let value = raw
            .to_str()
            .map_err(|_| unauthorized("invalid caller identity"))?;
        match UserId::parse(value) {
            Ok(user_id) => Ok(Self(user_id)),
            Err(err) => {
                debug!(error = %err, "rejecting caller identity");
                Err(unauthorized("invalid caller identity"))
            }
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}
