use rb_core::error::RetroError;
use rb_core::store::Store;
use rusqlite::Connection;

use crate::feedback_repo::FeedbackRepo;
use crate::member_repo::MemberRepo;
use crate::sprint_repo::SprintRepo;
use crate::sprint_task_repo::SprintTaskRepo;
use crate::trail_repo::TrailRepo;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Store for DbStore {
    type Sprints<'a>
        = SprintRepo<'a>
    where
        Self: 'a;
    type Members<'a>
        = MemberRepo<'a>
    where
        Self: 'a;
    type Feedback<'a>
        = FeedbackRepo<'a>
    where
        Self: 'a;
    type SprintTasks<'a>
        = SprintTaskRepo<'a>
    where
        Self: 'a;
    type Trail<'a>
        = TrailRepo<'a>
    where
        Self: 'a;

    fn sprints(&self) -> Self::Sprints<'_> {
        SprintRepo::new(&self.conn)
    }

    fn members(&self) -> Self::Members<'_> {
        MemberRepo::new(&self.conn)
    }

    fn feedback(&self) -> Self::Feedback<'_> {
        FeedbackRepo::new(&self.conn)
    }

    fn sprint_tasks(&self) -> Self::SprintTasks<'_> {
        SprintTaskRepo::new(&self.conn)
    }

    fn trail(&self) -> Self::Trail<'_> {
        TrailRepo::new(&self.conn)
    }

    fn with_tx<F, T>(&self, f: F) -> Result<T, RetroError>
    where
        F: FnOnce(&Self) -> Result<T, RetroError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(storage)?;
        let result = f(self);
        match result {
            Ok(value) => {
                self.conn.execute_batch("COMMIT").map_err(storage)?;
                Ok(value)
            }
            Err(err) => {
                self.conn.execute_batch("ROLLBACK").map_err(storage)?;
                Err(err)
            }
        }
    }
}

fn storage(err: rusqlite::Error) -> RetroError {
    RetroError::Storage {
        message: err.to_string(),
    }
}
