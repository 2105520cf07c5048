use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback not found")]
    NotFound,
    #[error("sprint not found")]
    SprintNotFound,
    #[error("can not update resolved goal")]
    ResolvedGoal,
    #[error("expectedAt can be updated only for goal type retrospective feedback")]
    ExpectedAtOnNonGoal,
    #[error("only goal typed retrospective feedback could be resolved or unresolved")]
    NotAGoal,
    #[error("{message}")]
    InvalidGoalView { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum SprintTaskError {
    #[error("sprint task not found")]
    NotFound,
    #[error("sprint not found")]
    SprintNotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum RetroError {
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    SprintTask(#[from] SprintTaskError),
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl From<crate::types::InvalidGoalView> for FeedbackError {
    fn from(value: crate::types::InvalidGoalView) -> Self {
        Self::InvalidGoalView {
            message: value.to_string(),
        }
    }
}
