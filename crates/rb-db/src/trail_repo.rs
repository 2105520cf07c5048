use crate::util::{from_rfc3339, to_rfc3339};
use rb_core::error::RetroError;
use rb_core::trail::TrailRepository;
use rb_core::types::{NewTrailEntry, TrailEntry, UserId};
use rusqlite::Connection;

pub struct TrailRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> TrailRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> TrailRepository for TrailRepo<'a> {
    fn append(&self, entry: NewTrailEntry) -> Result<TrailEntry, RetroError> {
        let at = chrono::Utc::now();
        let sql = "INSERT INTO trails (action, entity_name, entity_id, user_id, correlation_id, at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
        let params = (
            entry.action.as_str(),
            entry.entity_name.as_str(),
            entry.entity_id.as_str(),
            entry.user_id.get(),
            entry.correlation_id.as_deref(),
            to_rfc3339(&at),
        );
        self.conn.execute(sql, params).map_err(storage)?;
        Ok(TrailEntry {
            id: self.conn.last_insert_rowid(),
            action: entry.action,
            entity_name: entry.entity_name,
            entity_id: entry.entity_id,
            user_id: entry.user_id,
            correlation_id: entry.correlation_id,
            at,
        })
    }

    fn list(&self, entity_name: &str, entity_id: &str) -> Result<Vec<TrailEntry>, RetroError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, action, entity_name, entity_id, user_id, correlation_id, at FROM trails WHERE entity_name = ?1 AND entity_id = ?2 ORDER BY id ASC")
            .map_err(storage)?;
        let mut rows = stmt.query([entity_name, entity_id]).map_err(storage)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().map_err(storage)? {
            entries.push(map_trail_row(row)?);
        }
        Ok(entries)
    }
}

fn map_trail_row(row: &rusqlite::Row<'_>) -> Result<TrailEntry, RetroError> {
    let user_id: i64 = row.get(4).map_err(storage)?;
    let at: String = row.get(6).map_err(storage)?;
    Ok(TrailEntry {
        id: row.get(0).map_err(storage)?,
        action: row.get(1).map_err(storage)?,
        entity_name: row.get(2).map_err(storage)?,
        entity_id: row.get(3).map_err(storage)?,
        user_id: UserId::new(user_id).map_err(storage)?,
        correlation_id: row.get(5).map_err(storage)?,
        at: from_rfc3339(&at).map_err(storage)?,
    })
}

fn storage(err: impl std::fmt::Display) -> RetroError {
    RetroError::Storage {
        message: err.to_string(),
    }
}
