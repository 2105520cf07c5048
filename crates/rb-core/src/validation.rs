use crate::error::{FeedbackError, SprintTaskError};
use crate::types::{
    Feedback, FeedbackFilter, FeedbackType, GoalView, RetrospectiveId, Sprint,
    UpdateFeedbackInput, UpdateSprintTaskInput,
};
use chrono::{DateTime, SubsecRound, Utc};

pub const MAX_TASK_RATING: u8 = 4;

/// Stored timestamps keep microseconds.
const TIMESTAMP_DIGITS: u16 = 6;

/// Non-goal feedback is closed at the end of the sprint it was filed in.
pub fn initial_resolution(feedback_type: FeedbackType, sprint: &Sprint) -> Option<DateTime<Utc>> {
    match feedback_type {
        FeedbackType::Goal => None,
        FeedbackType::Highlight | FeedbackType::Note => Some(sprint.end_date),
    }
}

pub fn apply_feedback_update(
    feedback: &mut Feedback,
    input: UpdateFeedbackInput,
) -> Result<(), FeedbackError> {
    if feedback.is_goal() && feedback.is_resolved() {
        return Err(FeedbackError::ResolvedGoal);
    }
    if input.expected_at.is_some() && !feedback.is_goal() {
        return Err(FeedbackError::ExpectedAtOnNonGoal);
    }

    if let Some(scope) = input.scope {
        feedback.scope = scope;
    }
    if let Some(text) = input.text {
        feedback.text = text;
    }
    if let Some(expected_at) = input.expected_at {
        feedback.expected_at = Some(expected_at.trunc_subsecs(TIMESTAMP_DIGITS));
    }
    feedback.assignee_id = input.assignee_id;
    if feedback.assignee.as_ref().map(|user| user.id) != feedback.assignee_id {
        feedback.assignee = None;
    }
    Ok(())
}

pub fn apply_resolution(
    feedback: &mut Feedback,
    mark_resolved: bool,
    sprint: &Sprint,
) -> Result<(), FeedbackError> {
    if !feedback.is_goal() {
        return Err(FeedbackError::NotAGoal);
    }
    match (mark_resolved, feedback.resolved_at) {
        (true, None) => feedback.resolved_at = Some(sprint.end_date),
        (false, Some(_)) => feedback.resolved_at = None,
        _ => {}
    }
    Ok(())
}

pub fn window_filter(
    retro_id: RetrospectiveId,
    feedback_type: FeedbackType,
    sprint: &Sprint,
) -> FeedbackFilter {
    FeedbackFilter {
        added_within: Some(sprint.window()),
        ..FeedbackFilter::new(retro_id, feedback_type)
    }
}

pub fn goal_filter(retro_id: RetrospectiveId, view: GoalView, sprint: &Sprint) -> FeedbackFilter {
    let base = FeedbackFilter::new(retro_id, FeedbackType::Goal);
    match view {
        GoalView::Added => FeedbackFilter {
            unresolved_only: true,
            added_within: Some(sprint.window()),
            ..base
        },
        GoalView::Completed => FeedbackFilter {
            resolved_within: Some(sprint.window()),
            ..base
        },
        GoalView::Pending => FeedbackFilter {
            unresolved_only: true,
            added_before: Some(sprint.end_date),
            ..base
        },
    }
}

pub fn validate_sprint_task_update(input: &UpdateSprintTaskInput) -> Result<(), SprintTaskError> {
    if let Some(rating) = input.rating {
        if rating > MAX_TASK_RATING {
            return Err(SprintTaskError::InvalidInput {
                message: format!("rating must be between 0 and {MAX_TASK_RATING}"),
            });
        }
    }
    if let Some(points) = input.points_earned {
        if !points.is_finite() || points < 0.0 {
            return Err(SprintTaskError::InvalidInput {
                message: "pointsEarned must be a non-negative number".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        FeedbackId, FeedbackScope, SprintId, SprintStatus, UserId, UserSummary,
    };
    use chrono::TimeZone;

    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, n, 0, 0, 0).unwrap()
    }

    fn sprint(start: u32, end: u32) -> Sprint {
        Sprint {
            id: SprintId::new(1).unwrap(),
            retrospective_id: RetrospectiveId::new(1).unwrap(),
            title: "Sprint 1".to_string(),
            status: SprintStatus::Active,
            start_date: day(start),
            end_date: day(end),
        }
    }

    fn user(id: i64) -> UserSummary {
        UserSummary {
            id: UserId::new(id).unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: format!("user{id}@example.com"),
        }
    }

    fn feedback(feedback_type: FeedbackType, resolved_at: Option<DateTime<Utc>>) -> Feedback {
        Feedback {
            id: FeedbackId::new(1).unwrap(),
            retrospective_id: RetrospectiveId::new(1).unwrap(),
            feedback_type,
            sub_type: "went_well".to_string(),
            text: "original".to_string(),
            scope: FeedbackScope::Team,
            created_at: day(1),
            updated_at: day(1),
            added_at: day(1),
            expected_at: None,
            resolved_at,
            assignee_id: Some(UserId::new(2).unwrap()),
            assignee: Some(user(2)),
            created_by_id: UserId::new(1).unwrap(),
            created_by: user(1),
        }
    }

    #[test]
    fn non_goal_feedback_is_resolved_at_sprint_end() {
        let sprint = sprint(1, 10);
        assert_eq!(initial_resolution(FeedbackType::Highlight, &sprint), Some(day(10)));
        assert_eq!(initial_resolution(FeedbackType::Note, &sprint), Some(day(10)));
        assert_eq!(initial_resolution(FeedbackType::Goal, &sprint), None);
    }

    #[test]
    fn resolved_goal_rejects_every_patch() {
        let patches = [
            UpdateFeedbackInput::default(),
            UpdateFeedbackInput {
                text: Some("new".to_string()),
                ..Default::default()
            },
            UpdateFeedbackInput {
                assignee_id: Some(UserId::new(3).unwrap()),
                ..Default::default()
            },
        ];
        for patch in patches {
            let mut goal = feedback(FeedbackType::Goal, Some(day(10)));
            let err = apply_feedback_update(&mut goal, patch).unwrap_err();
            assert!(matches!(err, FeedbackError::ResolvedGoal));
            assert_eq!(goal.text, "original");
        }
    }

    #[test]
    fn expected_at_only_on_goals() {
        let patch = UpdateFeedbackInput {
            expected_at: Some(day(20)),
            ..Default::default()
        };
        let mut highlight = feedback(FeedbackType::Highlight, Some(day(10)));
        let err = apply_feedback_update(&mut highlight, patch.clone()).unwrap_err();
        assert!(matches!(err, FeedbackError::ExpectedAtOnNonGoal));

        let mut goal = feedback(FeedbackType::Goal, None);
        apply_feedback_update(&mut goal, patch).unwrap();
        assert_eq!(goal.expected_at, Some(day(20)));
    }

    #[test]
    fn expected_at_is_truncated_to_micros() {
        let precise = day(20) + chrono::Duration::nanoseconds(123_456_789);
        let mut goal = feedback(FeedbackType::Goal, None);
        apply_feedback_update(
            &mut goal,
            UpdateFeedbackInput {
                expected_at: Some(precise),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            goal.expected_at,
            Some(day(20) + chrono::Duration::microseconds(123_456))
        );
    }

    #[test]
    fn absent_fields_are_kept_but_assignee_is_cleared() {
        let mut highlight = feedback(FeedbackType::Highlight, Some(day(10)));
        apply_feedback_update(
            &mut highlight,
            UpdateFeedbackInput {
                scope: Some(FeedbackScope::Individual),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(highlight.scope, FeedbackScope::Individual);
        assert_eq!(highlight.text, "original");
        assert_eq!(highlight.assignee_id, None);
        assert_eq!(highlight.assignee, None);
    }

    #[test]
    fn resolution_toggles_and_is_idempotent() {
        let sprint = sprint(1, 10);
        let mut goal = feedback(FeedbackType::Goal, None);
        apply_resolution(&mut goal, true, &sprint).unwrap();
        assert_eq!(goal.resolved_at, Some(day(10)));

        let later = self::sprint(11, 20);
        apply_resolution(&mut goal, true, &later).unwrap();
        assert_eq!(goal.resolved_at, Some(day(10)));

        apply_resolution(&mut goal, false, &sprint).unwrap();
        assert_eq!(goal.resolved_at, None);
    }

    #[test]
    fn resolution_rejects_non_goals() {
        let mut note = feedback(FeedbackType::Note, Some(day(10)));
        let err = apply_resolution(&mut note, false, &sprint(1, 10)).unwrap_err();
        assert!(matches!(err, FeedbackError::NotAGoal));
        assert_eq!(note.resolved_at, Some(day(10)));
    }

    #[test]
    fn goal_views_build_expected_filters() {
        let sprint = sprint(5, 20);
        let retro = RetrospectiveId::new(1).unwrap();

        let added = goal_filter(retro, GoalView::Added, &sprint);
        assert!(added.unresolved_only);
        assert_eq!(added.added_within, Some(sprint.window()));
        assert_eq!(added.resolved_within, None);

        let completed = goal_filter(retro, GoalView::Completed, &sprint);
        assert!(!completed.unresolved_only);
        assert_eq!(completed.added_within, None);
        assert_eq!(completed.resolved_within, Some(sprint.window()));

        let pending = goal_filter(retro, GoalView::Pending, &sprint);
        assert!(pending.unresolved_only);
        assert_eq!(pending.added_before, Some(day(20)));
        assert_eq!(pending.added_within, None);
    }

    #[test]
    fn task_update_bounds() {
        let ok = UpdateSprintTaskInput {
            rating: Some(4),
            comment: None,
            points_earned: Some(2.5),
        };
        assert!(validate_sprint_task_update(&ok).is_ok());

        let bad_rating = UpdateSprintTaskInput {
            rating: Some(5),
            ..Default::default()
        };
        assert!(validate_sprint_task_update(&bad_rating).is_err());

        let bad_points = UpdateSprintTaskInput {
            points_earned: Some(-1.0),
            ..Default::default()
        };
        assert!(validate_sprint_task_update(&bad_points).is_err());
    }
}
