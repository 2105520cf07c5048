use crate::types::ids::{SprintId, SprintTaskId, UserId};
use crate::types::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SprintTask {
    pub id: SprintTaskId,
    pub sprint_id: SprintId,
    pub key: String,
    pub summary: String,
    pub task_type: String,
    pub points_assigned: f64,
    pub points_earned: f64,
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub assignee_id: Option<UserId>,
    pub assignee: Option<UserSummary>,
    pub is_done: bool,
    pub done_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SprintTaskList {
    pub tasks: Vec<SprintTask>,
}
