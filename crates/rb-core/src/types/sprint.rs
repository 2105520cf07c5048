use crate::types::enums::SprintStatus;
use crate::types::ids::{RetrospectiveId, SprintId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: SprintId,
    pub retrospective_id: RetrospectiveId,
    pub title: String,
    pub status: SprintStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Sprint {
    pub fn window(&self) -> TimeRange {
        TimeRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// Closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
