use rb_core::error::RetroError;
use rb_core::members::MemberRepository;
use rb_core::types::{RetrospectiveId, UserId};
use rusqlite::{Connection, OptionalExtension};

pub struct MemberRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> MemberRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> MemberRepository for MemberRepo<'a> {
    fn is_member(&self, retro_id: RetrospectiveId, user_id: UserId) -> Result<bool, RetroError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM retrospective_members WHERE retrospective_id = ?1 AND user_id = ?2",
                (retro_id.get(), user_id.get()),
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| RetroError::Storage {
                message: err.to_string(),
            })?;
        Ok(found.is_some())
    }
}
