use crate::error::SprintTaskError;
use crate::types::{SprintId, SprintTask, SprintTaskId, UpdateSprintTaskInput};
use chrono::{DateTime, Utc};

pub trait SprintTaskRepository {
    fn list(&self, sprint_id: SprintId) -> Result<Vec<SprintTask>, SprintTaskError>;
    fn get(&self, id: SprintTaskId) -> Result<Option<SprintTask>, SprintTaskError>;
    fn update(
        &self,
        id: SprintTaskId,
        input: UpdateSprintTaskInput,
    ) -> Result<SprintTask, SprintTaskError>;
    fn set_done(
        &self,
        id: SprintTaskId,
        done_at: Option<DateTime<Utc>>,
    ) -> Result<SprintTask, SprintTaskError>;
}
