use crate::util::{decode_enum, from_rfc3339};
use rb_core::error::RetroError;
use rb_core::sprints::SprintRepository;
use rb_core::types::{RetrospectiveId, Sprint, SprintId};
use rusqlite::Connection;

pub struct SprintRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> SprintRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> SprintRepository for SprintRepo<'a> {
    fn get(&self, id: SprintId) -> Result<Option<Sprint>, RetroError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, retrospective_id, title, status, start_date, end_date FROM sprints WHERE id = ?1")
            .map_err(storage)?;
        let mut rows = stmt.query([id.get()]).map_err(storage)?;
        let Some(row) = rows.next().map_err(storage)? else {
            return Ok(None);
        };
        map_sprint_row(row).map(Some)
    }
}

fn map_sprint_row(row: &rusqlite::Row<'_>) -> Result<Sprint, RetroError> {
    let id: i64 = row.get(0).map_err(storage)?;
    let retrospective_id: i64 = row.get(1).map_err(storage)?;
    let title: String = row.get(2).map_err(storage)?;
    let status: String = row.get(3).map_err(storage)?;
    let start_date: String = row.get(4).map_err(storage)?;
    let end_date: String = row.get(5).map_err(storage)?;

    Ok(Sprint {
        id: SprintId::new(id).map_err(storage)?,
        retrospective_id: RetrospectiveId::new(retrospective_id).map_err(storage)?,
        title,
        status: decode_enum(&status).map_err(storage)?,
        start_date: from_rfc3339(&start_date).map_err(storage)?,
        end_date: from_rfc3339(&end_date).map_err(storage)?,
    })
}

fn storage(err: impl std::fmt::Display) -> RetroError {
    RetroError::Storage {
        message: err.to_string(),
    }
}
