use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum FeedbackType {
    Highlight,
    Note,
    Goal,
}

impl FeedbackType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Highlight => "Highlight",
            Self::Note => "Note",
            Self::Goal => "Goal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum FeedbackScope {
    Individual,
    #[default]
    Team,
    Organisation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum SprintStatus {
    Draft,
    Active,
    Completed,
}

/// Named views over a retrospective's goals for one sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GoalView {
    /// Unresolved goals added during the sprint.
    Added,
    /// Goals resolved during the sprint.
    Completed,
    /// Unresolved goals added before the sprint ended.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGoalView(pub String);

impl fmt::Display for InvalidGoalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid goal type: {}", self.0)
    }
}

impl std::error::Error for InvalidGoalView {}

impl FromStr for GoalView {
    type Err = InvalidGoalView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(Self::Added),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(InvalidGoalView(other.to_string())),
        }
    }
}
