use crate::error::{FeedbackError, RetroError, SprintTaskError};
use crate::feedback::FeedbackRepository;
use crate::members::MemberRepository;
use crate::permissions::PermissionService;
use crate::sprint_tasks::SprintTaskRepository;
use crate::sprints::SprintRepository;
use crate::store::Store;
use crate::trail::{TrailRepository, TrailService};
use crate::types::{
    CreateFeedbackInput, Feedback, FeedbackId, FeedbackList, FeedbackType, GoalView,
    NewFeedback, NewTrailEntry, RetrospectiveId, Sprint, SprintId, SprintStatus, SprintTask,
    SprintTaskId, SprintTaskList, TrailEntry, UpdateFeedbackInput, UpdateSprintTaskInput, UserId,
};
use crate::validation::{
    apply_feedback_update, apply_resolution, goal_filter, initial_resolution,
    validate_sprint_task_update, window_filter,
};
use chrono::Utc;
use tracing::{debug, warn};

pub struct RetroBoard<S: Store> {
    store: S,
}

impl<S: Store> RetroBoard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn feedback(&self) -> FeedbackApi<'_, S> {
        FeedbackApi { core: self }
    }

    pub fn sprint_tasks(&self) -> SprintTasksApi<'_, S> {
        SprintTasksApi { core: self }
    }

    pub fn permissions(&self) -> PermissionsApi<'_, S> {
        PermissionsApi { core: self }
    }

    pub fn trail(&self) -> TrailApi<'_, S> {
        TrailApi { core: self }
    }
}

pub struct FeedbackApi<'a, S: Store> {
    core: &'a RetroBoard<S>,
}

impl<'a, S: Store> FeedbackApi<'a, S> {
    pub fn add(
        &self,
        user_id: UserId,
        sprint_id: SprintId,
        retro_id: RetrospectiveId,
        feedback_type: FeedbackType,
        input: CreateFeedbackInput,
    ) -> Result<Feedback, RetroError> {
        debug!(%user_id, %sprint_id, %retro_id, kind = feedback_type.label(), "add feedback");
        if input.sub_type.trim().is_empty() {
            return Err(FeedbackError::InvalidInput {
                message: "subType is required".to_string(),
            }
            .into());
        }
        self.core.store.with_tx(|store| {
            let sprint = feedback_sprint(store, sprint_id)?;
            let feedback = store.feedback().create(NewFeedback {
                retrospective_id: retro_id,
                feedback_type,
                sub_type: input.sub_type,
                text: input.text.unwrap_or_default(),
                scope: input.scope.unwrap_or_default(),
                added_at: sprint.start_date,
                resolved_at: initial_resolution(feedback_type, &sprint),
                created_by_id: user_id,
            })?;
            Ok(feedback)
        })
    }

    pub fn update(
        &self,
        user_id: UserId,
        retro_id: RetrospectiveId,
        feedback_type: FeedbackType,
        feedback_id: FeedbackId,
        input: UpdateFeedbackInput,
    ) -> Result<Feedback, RetroError> {
        debug!(%user_id, %retro_id, %feedback_id, kind = feedback_type.label(), "update feedback");
        self.core.store.with_tx(|store| {
            let mut feedback = scoped_feedback(store, retro_id, Some(feedback_type), feedback_id)?;
            apply_feedback_update(&mut feedback, input)?;
            Ok(store.feedback().save(&feedback)?)
        })
    }

    pub fn resolve(
        &self,
        user_id: UserId,
        sprint_id: SprintId,
        retro_id: RetrospectiveId,
        feedback_id: FeedbackId,
        mark_resolved: bool,
    ) -> Result<Feedback, RetroError> {
        debug!(%user_id, %sprint_id, %retro_id, %feedback_id, mark_resolved, "resolve feedback");
        self.core.store.with_tx(|store| {
            let sprint = feedback_sprint(store, sprint_id)?;
            let mut feedback = scoped_feedback(store, retro_id, None, feedback_id)?;
            apply_resolution(&mut feedback, mark_resolved, &sprint)?;
            Ok(store.feedback().save(&feedback)?)
        })
    }

    pub fn list(
        &self,
        user_id: UserId,
        sprint_id: SprintId,
        retro_id: RetrospectiveId,
        feedback_type: FeedbackType,
    ) -> Result<FeedbackList, RetroError> {
        debug!(%user_id, %sprint_id, %retro_id, kind = feedback_type.label(), "list feedback");
        let store = &self.core.store;
        let sprint = feedback_sprint(store, sprint_id)?;
        let filter = window_filter(retro_id, feedback_type, &sprint);
        let feedbacks = store.feedback().list(&filter)?;
        Ok(FeedbackList { feedbacks })
    }

    pub fn list_goals(
        &self,
        user_id: UserId,
        sprint_id: SprintId,
        retro_id: RetrospectiveId,
        view: GoalView,
    ) -> Result<FeedbackList, RetroError> {
        debug!(%user_id, %sprint_id, %retro_id, ?view, "list goals");
        let store = &self.core.store;
        let sprint = feedback_sprint(store, sprint_id)?;
        let filter = goal_filter(retro_id, view, &sprint);
        let feedbacks = store.feedback().list(&filter)?;
        Ok(FeedbackList { feedbacks })
    }
}

fn feedback_sprint<S: Store>(store: &S, sprint_id: SprintId) -> Result<Sprint, RetroError> {
    store
        .sprints()
        .get(sprint_id)?
        .ok_or(RetroError::Feedback(FeedbackError::SprintNotFound))
}

/// Feedback outside the retrospective, or of another type when one is given,
/// is reported as missing.
fn scoped_feedback<S: Store>(
    store: &S,
    retro_id: RetrospectiveId,
    feedback_type: Option<FeedbackType>,
    feedback_id: FeedbackId,
) -> Result<Feedback, RetroError> {
    match store.feedback().get(feedback_id)? {
        Some(feedback)
            if feedback.retrospective_id == retro_id
                && feedback_type.is_none_or(|kind| kind == feedback.feedback_type) =>
        {
            Ok(feedback)
        }
        _ => Err(RetroError::Feedback(FeedbackError::NotFound)),
    }
}

pub struct SprintTasksApi<'a, S: Store> {
    core: &'a RetroBoard<S>,
}

impl<'a, S: Store> SprintTasksApi<'a, S> {
    pub fn list(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
    ) -> Result<SprintTaskList, RetroError> {
        let store = &self.core.store;
        let sprint = task_sprint(store, retro_id, sprint_id)?;
        let tasks = store.sprint_tasks().list(sprint.id)?;
        Ok(SprintTaskList { tasks })
    }

    pub fn get(
        &self,
        id: SprintTaskId,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
    ) -> Result<SprintTask, RetroError> {
        let store = &self.core.store;
        let sprint = task_sprint(store, retro_id, sprint_id)?;
        scoped_task(store, &sprint, id)
    }

    pub fn update(
        &self,
        id: SprintTaskId,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        input: UpdateSprintTaskInput,
    ) -> Result<SprintTask, RetroError> {
        validate_sprint_task_update(&input)?;
        self.core.store.with_tx(|store| {
            let sprint = task_sprint(store, retro_id, sprint_id)?;
            scoped_task(store, &sprint, id)?;
            Ok(store.sprint_tasks().update(id, input)?)
        })
    }

    pub fn mark_done(
        &self,
        id: SprintTaskId,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
    ) -> Result<SprintTask, RetroError> {
        self.core.store.with_tx(|store| {
            let sprint = task_sprint(store, retro_id, sprint_id)?;
            let task = scoped_task(store, &sprint, id)?;
            if task.is_done {
                return Ok(task);
            }
            Ok(store.sprint_tasks().set_done(id, Some(Utc::now()))?)
        })
    }

    pub fn mark_undone(
        &self,
        id: SprintTaskId,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
    ) -> Result<SprintTask, RetroError> {
        self.core.store.with_tx(|store| {
            let sprint = task_sprint(store, retro_id, sprint_id)?;
            let task = scoped_task(store, &sprint, id)?;
            if !task.is_done {
                return Ok(task);
            }
            Ok(store.sprint_tasks().set_done(id, None)?)
        })
    }
}

fn task_sprint<S: Store>(
    store: &S,
    retro_id: RetrospectiveId,
    sprint_id: SprintId,
) -> Result<Sprint, RetroError> {
    match store.sprints().get(sprint_id)? {
        Some(sprint) if sprint.retrospective_id == retro_id => Ok(sprint),
        _ => Err(RetroError::SprintTask(SprintTaskError::SprintNotFound)),
    }
}

fn scoped_task<S: Store>(
    store: &S,
    sprint: &Sprint,
    id: SprintTaskId,
) -> Result<SprintTask, RetroError> {
    match store.sprint_tasks().get(id)? {
        Some(task) if task.sprint_id == sprint.id => Ok(task),
        _ => Err(RetroError::SprintTask(SprintTaskError::NotFound)),
    }
}

pub struct PermissionsApi<'a, S: Store> {
    core: &'a RetroBoard<S>,
}

impl<'a, S: Store> PermissionsApi<'a, S> {
    fn member_sprint(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        user_id: UserId,
    ) -> Result<Option<Sprint>, RetroError> {
        let store = &self.core.store;
        let Some(sprint) = store.sprints().get(sprint_id)? else {
            return Ok(None);
        };
        if sprint.retrospective_id != retro_id {
            return Ok(None);
        }
        if !store.members().is_member(retro_id, user_id)? {
            return Ok(None);
        }
        Ok(Some(sprint))
    }

    fn task_in_sprint(&self, sprint: &Sprint, task_id: SprintTaskId) -> Result<bool, RetroError> {
        let task = self.core.store.sprint_tasks().get(task_id)?;
        Ok(task.is_some_and(|task| task.sprint_id == sprint.id))
    }
}

fn granted(check: &str, result: Result<bool, RetroError>) -> bool {
    match result {
        Ok(allowed) => allowed,
        Err(err) => {
            warn!(check, error = %err, "permission check failed, denying");
            false
        }
    }
}

impl<'a, S: Store> PermissionService for PermissionsApi<'a, S> {
    fn can_access_retrospective_feedback(&self, sprint_id: SprintId) -> bool {
        let result = self
            .core
            .store
            .sprints()
            .get(sprint_id)
            .map(|sprint| sprint.is_some_and(|sprint| sprint.status != SprintStatus::Draft));
        granted("can_access_retrospective_feedback", result)
    }

    fn user_can_access_sprint(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        user_id: UserId,
    ) -> bool {
        let result = self
            .member_sprint(retro_id, sprint_id, user_id)
            .map(|sprint| sprint.is_some());
        granted("user_can_access_sprint", result)
    }

    fn user_can_edit_sprint(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        user_id: UserId,
    ) -> bool {
        let result = self
            .member_sprint(retro_id, sprint_id, user_id)
            .map(|sprint| sprint.is_some_and(|sprint| sprint.status == SprintStatus::Active));
        granted("user_can_edit_sprint", result)
    }

    fn user_can_access_sprint_task(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        task_id: SprintTaskId,
        user_id: UserId,
    ) -> bool {
        let result = self
            .member_sprint(retro_id, sprint_id, user_id)
            .and_then(|sprint| match sprint {
                Some(sprint) => self.task_in_sprint(&sprint, task_id),
                None => Ok(false),
            });
        granted("user_can_access_sprint_task", result)
    }

    fn user_can_edit_sprint_task(
        &self,
        retro_id: RetrospectiveId,
        sprint_id: SprintId,
        task_id: SprintTaskId,
        user_id: UserId,
    ) -> bool {
        let result = self
            .member_sprint(retro_id, sprint_id, user_id)
            .and_then(|sprint| match sprint {
                Some(sprint) if sprint.status == SprintStatus::Active => {
                    self.task_in_sprint(&sprint, task_id)
                }
                _ => Ok(false),
            });
        granted("user_can_edit_sprint_task", result)
    }
}

pub struct TrailApi<'a, S: Store> {
    core: &'a RetroBoard<S>,
}

impl<'a, S: Store> TrailApi<'a, S> {
    pub fn list(&self, entity_name: &str, entity_id: &str) -> Result<Vec<TrailEntry>, RetroError> {
        self.core.store.trail().list(entity_name, entity_id)
    }
}

impl<'a, S: Store> TrailService for TrailApi<'a, S> {
    fn add(
        &self,
        action: &str,
        entity_name: &str,
        entity_id: &str,
        user_id: UserId,
        correlation_id: Option<String>,
    ) {
        let entry = NewTrailEntry {
            action: action.to_string(),
            entity_name: entity_name.to_string(),
            entity_id: entity_id.to_string(),
            user_id,
            correlation_id,
        };
        if let Err(err) = self.core.store.trail().append(entry) {
            warn!(action, entity_name, entity_id, error = %err, "failed to record trail entry");
        }
    }
}
