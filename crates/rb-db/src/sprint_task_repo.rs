use crate::util::{from_opt_rfc3339, from_rfc3339, map_user, to_rfc3339};
use chrono::{DateTime, Utc};
use rb_core::error::SprintTaskError;
use rb_core::sprint_tasks::SprintTaskRepository;
use rb_core::types::{SprintId, SprintTask, SprintTaskId, UpdateSprintTaskInput};
use rusqlite::Connection;

const SELECT_TASK: &str = "SELECT t.id, t.sprint_id, t.key, t.summary, t.task_type, \
    t.points_assigned, t.points_earned, t.rating, t.comment, t.done_at, t.created_at, t.updated_at, \
    t.assignee_id, a.first_name, a.last_name, a.email \
    FROM sprint_tasks t \
    LEFT JOIN users a ON a.id = t.assignee_id";

pub struct SprintTaskRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> SprintTaskRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> SprintTaskRepository for SprintTaskRepo<'a> {
    fn list(&self, sprint_id: SprintId) -> Result<Vec<SprintTask>, SprintTaskError> {
        let sql = format!("{SELECT_TASK} WHERE t.sprint_id = ?1 ORDER BY t.key ASC, t.id ASC");
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let mut rows = stmt.query([sprint_id.get()]).map_err(storage)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            tasks.push(map_task_row(row)?);
        }
        Ok(tasks)
    }

    fn get(&self, id: SprintTaskId) -> Result<Option<SprintTask>, SprintTaskError> {
        let sql = format!("{SELECT_TASK} WHERE t.id = ?1");
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let mut rows = stmt.query([id.get()]).map_err(storage)?;
        let Some(row) = rows.next().map_err(storage)? else {
            return Ok(None);
        };
        map_task_row(row).map(Some)
    }

    fn update(
        &self,
        id: SprintTaskId,
        input: UpdateSprintTaskInput,
    ) -> Result<SprintTask, SprintTaskError> {
        let mut task = self.get(id)?.ok_or(SprintTaskError::NotFound)?;
        if let Some(rating) = input.rating {
            task.rating = Some(rating);
        }
        if let Some(comment) = input.comment {
            task.comment = Some(comment);
        }
        if let Some(points) = input.points_earned {
            task.points_earned = points;
        }

        let sql = "UPDATE sprint_tasks SET rating = ?1, comment = ?2, points_earned = ?3, updated_at = ?4 WHERE id = ?5";
        let params = (
            task.rating,
            task.comment.as_deref(),
            task.points_earned,
            to_rfc3339(&Utc::now()),
            id.get(),
        );
        self.conn.execute(sql, params).map_err(storage)?;
        self.get(id)?.ok_or(SprintTaskError::NotFound)
    }

    fn set_done(
        &self,
        id: SprintTaskId,
        done_at: Option<DateTime<Utc>>,
    ) -> Result<SprintTask, SprintTaskError> {
        let sql = "UPDATE sprint_tasks SET done_at = ?1, updated_at = ?2 WHERE id = ?3";
        let params = (
            done_at.map(|value| to_rfc3339(&value)),
            to_rfc3339(&Utc::now()),
            id.get(),
        );
        let changed = self.conn.execute(sql, params).map_err(storage)?;
        if changed == 0 {
            return Err(SprintTaskError::NotFound);
        }
        self.get(id)?.ok_or(SprintTaskError::NotFound)
    }
}

fn map_task_row(row: &rusqlite::Row<'_>) -> Result<SprintTask, SprintTaskError> {
    let id: i64 = row.get(0).map_err(storage)?;
    let sprint_id: i64 = row.get(1).map_err(storage)?;
    let done_at: Option<String> = row.get(9).map_err(storage)?;
    let created_at: String = row.get(10).map_err(storage)?;
    let updated_at: String = row.get(11).map_err(storage)?;
    let assignee_id: Option<i64> = row.get(12).map_err(storage)?;

    let assignee = match assignee_id {
        Some(value) => Some(map_user(row, value, 13).map_err(storage)?),
        None => None,
    };
    let done_at = from_opt_rfc3339(done_at).map_err(storage)?;

    Ok(SprintTask {
        id: SprintTaskId::new(id).map_err(storage)?,
        sprint_id: SprintId::new(sprint_id).map_err(storage)?,
        key: row.get(2).map_err(storage)?,
        summary: row.get(3).map_err(storage)?,
        task_type: row.get(4).map_err(storage)?,
        points_assigned: row.get(5).map_err(storage)?,
        points_earned: row.get(6).map_err(storage)?,
        rating: row.get(7).map_err(storage)?,
        comment: row.get(8).map_err(storage)?,
        assignee_id: assignee.as_ref().map(|user| user.id),
        assignee,
        is_done: done_at.is_some(),
        done_at,
        created_at: from_rfc3339(&created_at).map_err(storage)?,
        updated_at: from_rfc3339(&updated_at).map_err(storage)?,
    })
}

fn storage(err: impl std::fmt::Display) -> SprintTaskError {
    SprintTaskError::Storage {
        message: err.to_string(),
    }
}
