use crate::types::{RetrospectiveId, SprintId, SprintTaskId, UserId};

/// Capability checks consulted by the HTTP layer before any domain call.
pub trait PermissionService {
    fn can_access_retrospective_feedback(&self, sprint_id: SprintId) -> bool;
    fn user_can_access_sprint(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        user_id: UserId,
    ) -> bool;
    fn user_can_edit_sprint(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        user_id: UserId,
    ) -> bool;
    fn user_can_access_sprint_task(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        task_id: SprintTaskId,
        user_id: UserId,
    ) -> bool;
    fn user_can_edit_sprint_task(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        task_id: SprintTaskId,
        user_id: UserId,
    ) -> bool;
}
