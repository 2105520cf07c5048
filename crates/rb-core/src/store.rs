use crate::RetroError;
use crate::feedback::FeedbackRepository;
use crate::members::MemberRepository;
use crate::sprint_tasks::SprintTaskRepository;
use crate::sprints::SprintRepository;
use crate::trail::TrailRepository;

pub trait Store {
    type Sprints<'a>: SprintRepository
    where
        Self: 'a;
    type Members<'a>: MemberRepository
    where
        Self: 'a;
    type Feedback<'a>: FeedbackRepository
    where
        Self: 'a;
    type SprintTasks<'a>: SprintTaskRepository
    where
        Self: 'a;
    type Trail<'a>: TrailRepository
    where
        Self: 'a;

    fn sprints(&self) -> Self::Sprints<'_>;
    fn members(&self) -> Self::Members<'_>;
    fn feedback(&self) -> Self::Feedback<'_>;
    fn sprint_tasks(&self) -> Self::SprintTasks<'_>;
    fn trail(&self) -> Self::Trail<'_>;

    fn with_tx<F, T>(&self, f: F) -> Result<T, RetroError>
    where
        F: FnOnce(&Self) -> Result<T, RetroError>;
}
