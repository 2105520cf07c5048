use crate::util::{
    decode_enum, encode_enum, from_opt_rfc3339, from_rfc3339, map_user, to_rfc3339,
};
use rb_core::error::FeedbackError;
use rb_core::feedback::FeedbackRepository;
use rb_core::types::{Feedback, FeedbackFilter, FeedbackId, NewFeedback, RetrospectiveId, UserId};
use rusqlite::Connection;
use rusqlite::types::Value;

const SELECT_FEEDBACK: &str = "SELECT f.id, f.retrospective_id, f.type, f.sub_type, f.text, f.scope, \
    f.created_at, f.updated_at, f.added_at, f.expected_at, f.resolved_at, \
    f.assignee_id, a.first_name, a.last_name, a.email, \
    f.created_by_id, c.first_name, c.last_name, c.email \
    FROM retrospective_feedback f \
    JOIN users c ON c.id = f.created_by_id \
    LEFT JOIN users a ON a.id = f.assignee_id";

pub struct FeedbackRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> FeedbackRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> FeedbackRepository for FeedbackRepo<'a> {
    fn create(&self, input: NewFeedback) -> Result<Feedback, FeedbackError> {
        let now = to_rfc3339(&chrono::Utc::now());
        let sql = "INSERT INTO retrospective_feedback (retrospective_id, type, sub_type, text, scope, created_at, updated_at, added_at, expected_at, resolved_at, assignee_id, created_by_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9, NULL, ?10)";
        let params = (
            input.retrospective_id.get(),
            encode_enum(&input.feedback_type).map_err(storage)?,
            input.sub_type.as_str(),
            input.text.as_str(),
            encode_enum(&input.scope).map_err(storage)?,
            now.as_str(),
            now.as_str(),
            to_rfc3339(&input.added_at),
            input.resolved_at.map(|value| to_rfc3339(&value)),
            input.created_by_id.get(),
        );
        self.conn.execute(sql, params).map_err(storage)?;
        let id = FeedbackId::new(self.conn.last_insert_rowid()).map_err(storage)?;
        self.get(id)?.ok_or(FeedbackError::NotFound)
    }

    fn get(&self, id: FeedbackId) -> Result<Option<Feedback>, FeedbackError> {
        let sql = format!("{SELECT_FEEDBACK} WHERE f.id = ?1");
        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let mut rows = stmt.query([id.get()]).map_err(storage)?;
        let Some(row) = rows.next().map_err(storage)? else {
            return Ok(None);
        };
        map_feedback_row(row).map(Some)
    }

    fn save(&self, feedback: &Feedback) -> Result<Feedback, FeedbackError> {
        let sql = "UPDATE retrospective_feedback SET scope = ?1, text = ?2, expected_at = ?3, resolved_at = ?4, assignee_id = ?5, updated_at = ?6 WHERE id = ?7";
        let params = (
            encode_enum(&feedback.scope).map_err(storage)?,
            feedback.text.as_str(),
            feedback.expected_at.map(|value| to_rfc3339(&value)),
            feedback.resolved_at.map(|value| to_rfc3339(&value)),
            feedback.assignee_id.map(UserId::get),
            to_rfc3339(&chrono::Utc::now()),
            feedback.id.get(),
        );
        let changed = self.conn.execute(sql, params).map_err(storage)?;
        if changed == 0 {
            return Err(FeedbackError::NotFound);
        }
        self.get(feedback.id)?.ok_or(FeedbackError::NotFound)
    }

    fn list(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>, FeedbackError> {
        let mut sql = format!("{SELECT_FEEDBACK} WHERE f.retrospective_id = ? AND f.type = ?");
        let mut params: Vec<Value> = vec![
            filter.retrospective_id.get().into(),
            encode_enum(&filter.feedback_type).map_err(storage)?.into(),
        ];
        if filter.unresolved_only {
            sql.push_str(" AND f.resolved_at IS NULL");
        }
        if let Some(range) = filter.added_within {
            sql.push_str(" AND f.added_at >= ? AND f.added_at <= ?");
            params.push(to_rfc3339(&range.start).into());
            params.push(to_rfc3339(&range.end).into());
        }
        if let Some(before) = filter.added_before {
            sql.push_str(" AND f.added_at < ?");
            params.push(to_rfc3339(&before).into());
        }
        if let Some(range) = filter.resolved_within {
            sql.push_str(" AND f.resolved_at >= ? AND f.resolved_at <= ?");
            params.push(to_rfc3339(&range.start).into());
            params.push(to_rfc3339(&range.end).into());
        }
        sql.push_str(" ORDER BY f.added_at ASC, f.id ASC");

        let mut stmt = self.conn.prepare(&sql).map_err(storage)?;
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params))
            .map_err(storage)?;
        let mut feedbacks = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            feedbacks.push(map_feedback_row(row)?);
        }
        Ok(feedbacks)
    }
}

fn map_feedback_row(row: &rusqlite::Row<'_>) -> Result<Feedback, FeedbackError> {
    let id: i64 = row.get(0).map_err(storage)?;
    let retrospective_id: i64 = row.get(1).map_err(storage)?;
    let feedback_type: String = row.get(2).map_err(storage)?;
    let sub_type: String = row.get(3).map_err(storage)?;
    let text: String = row.get(4).map_err(storage)?;
    let scope: String = row.get(5).map_err(storage)?;
    let created_at: String = row.get(6).map_err(storage)?;
    let updated_at: String = row.get(7).map_err(storage)?;
    let added_at: String = row.get(8).map_err(storage)?;
    let expected_at: Option<String> = row.get(9).map_err(storage)?;
    let resolved_at: Option<String> = row.get(10).map_err(storage)?;
    let assignee_id: Option<i64> = row.get(11).map_err(storage)?;
    let created_by_id: i64 = row.get(15).map_err(storage)?;

    let assignee = match assignee_id {
        Some(value) => Some(map_user(row, value, 12).map_err(storage)?),
        None => None,
    };
    let created_by = map_user(row, created_by_id, 16).map_err(storage)?;

    Ok(Feedback {
        id: FeedbackId::new(id).map_err(storage)?,
        retrospective_id: RetrospectiveId::new(retrospective_id).map_err(storage)?,
        feedback_type: decode_enum(&feedback_type).map_err(storage)?,
        sub_type,
        text,
        scope: decode_enum(&scope).map_err(storage)?,
        created_at: from_rfc3339(&created_at).map_err(storage)?,
        updated_at: from_rfc3339(&updated_at).map_err(storage)?,
        added_at: from_rfc3339(&added_at).map_err(storage)?,
        expected_at: from_opt_rfc3339(expected_at).map_err(storage)?,
        resolved_at: from_opt_rfc3339(resolved_at).map_err(storage)?,
        assignee_id: assignee.as_ref().map(|user| user.id),
        assignee,
        created_by_id: created_by.id,
        created_by,
    })
}

fn storage(err: impl std::fmt::Display) -> FeedbackError {
    FeedbackError::Storage {
        message: err.to_string(),
    }
}
