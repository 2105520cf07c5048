use crate::types::enums::{FeedbackScope, FeedbackType};
use crate::types::ids::{FeedbackId, RetrospectiveId, UserId};
use crate::types::sprint::TimeRange;
use crate::types::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub retrospective_id: RetrospectiveId,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub sub_type: String,
    pub text: String,
    pub scope: FeedbackScope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub added_at: DateTime<Utc>,
    pub expected_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub assignee_id: Option<UserId>,
    pub assignee: Option<UserSummary>,
    pub created_by_id: UserId,
    pub created_by: UserSummary,
}

impl Feedback {
    pub fn is_goal(&self) -> bool {
        self.feedback_type == FeedbackType::Goal
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackList {
    pub feedbacks: Vec<Feedback>,
}

/// Row to insert; hydrated fields are filled in by the store on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub retrospective_id: RetrospectiveId,
    pub feedback_type: FeedbackType,
    pub sub_type: String,
    pub text: String,
    pub scope: FeedbackScope,
    pub added_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_by_id: UserId,
}

/// Conditions are combined with AND. Ranges are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub retrospective_id: RetrospectiveId,
    pub feedback_type: FeedbackType,
    pub added_within: Option<TimeRange>,
    pub added_before: Option<DateTime<Utc>>,
    pub resolved_within: Option<TimeRange>,
    pub unresolved_only: bool,
}

impl FeedbackFilter {
    pub fn new(retrospective_id: RetrospectiveId, feedback_type: FeedbackType) -> Self {
        Self {
            retrospective_id,
            feedback_type,
            added_within: None,
            added_before: None,
            resolved_within: None,
            unresolved_only: false,
        }
    }
}
