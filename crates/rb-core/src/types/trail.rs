use crate::types::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrailEntry {
    pub id: i64,
    pub action: String,
    pub entity_name: String,
    pub entity_id: String,
    pub user_id: UserId,
    pub correlation_id: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrailEntry {
    pub action: String,
    pub entity_name: String,
    pub entity_id: String,
    pub user_id: UserId,
    pub correlation_id: Option<String>,
}
