use crate::types::enums::FeedbackScope;
use crate::types::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackInput {
    pub sub_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub scope: Option<FeedbackScope>,
}

/// Field-level patch. `scope`, `text` and `expected_at` are applied only when
/// present; `assignee_id` always replaces the stored value, so omitting it
/// clears the assignee. `expected_at` is kept to microsecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackInput {
    #[serde(default)]
    pub scope: Option<FeedbackScope>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub expected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSprintTaskInput {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub points_earned: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GoalListQuery {
    pub goal_type: String,
}
