//! Loads users, retrospectives, sprints and sprint tasks owned by upstream
//! systems. Rows are upserted by id so a seed file can be re-applied.

use crate::util::{encode_enum, to_rfc3339};
use chrono::{DateTime, Utc};
use rb_core::types::SprintStatus;
use rusqlite::Connection;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed failed: {message}")]
    Sqlite { message: String },
    #[error("invalid seed: {message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub retrospectives: Vec<SeedRetrospective>,
    #[serde(default)]
    pub sprints: Vec<SeedSprint>,
    #[serde(default)]
    pub sprint_tasks: Vec<SeedSprintTask>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRetrospective {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub members: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSprint {
    pub id: i64,
    pub retrospective_id: i64,
    pub title: String,
    pub status: SprintStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSprintTask {
    pub id: i64,
    pub sprint_id: i64,
    pub key: String,
    pub summary: String,
    pub task_type: String,
    #[serde(default)]
    pub points_assigned: f64,
    #[serde(default)]
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub retrospectives: usize,
    pub members: usize,
    pub sprints: usize,
    pub sprint_tasks: usize,
}

pub fn apply_seed(conn: &Connection, seed: &SeedData) -> Result<SeedSummary, SeedError> {
    for sprint in &seed.sprints {
        if sprint.end_date < sprint.start_date {
            return Err(SeedError::Invalid {
                message: format!("sprint {} ends before it starts", sprint.id),
            });
        }
    }

    let tx = conn.unchecked_transaction().map_err(sqlite)?;
    let mut summary = SeedSummary::default();

    for user in &seed.users {
        tx.execute(
            "INSERT INTO users (id, first_name, last_name, email) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(id) DO UPDATE SET first_name = excluded.first_name, last_name = excluded.last_name, email = excluded.email",
            (user.id, &user.first_name, &user.last_name, &user.email),
        )
        .map_err(sqlite)?;
        summary.users += 1;
    }

    for retro in &seed.retrospectives {
        tx.execute(
            "INSERT INTO retrospectives (id, title) VALUES (?1, ?2) \
             ON CONFLICT(id) DO UPDATE SET title = excluded.title",
            (retro.id, &retro.title),
        )
        .map_err(sqlite)?;
        summary.retrospectives += 1;
        for user_id in &retro.members {
            tx.execute(
                "INSERT OR IGNORE INTO retrospective_members (retrospective_id, user_id) VALUES (?1, ?2)",
                (retro.id, user_id),
            )
            .map_err(sqlite)?;
            summary.members += 1;
        }
    }

    for sprint in &seed.sprints {
        let status = encode_enum(&sprint.status).map_err(|err| SeedError::Invalid {
            message: err.to_string(),
        })?;
        tx.execute(
            "INSERT INTO sprints (id, retrospective_id, title, status, start_date, end_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(id) DO UPDATE SET retrospective_id = excluded.retrospective_id, title = excluded.title, \
             status = excluded.status, start_date = excluded.start_date, end_date = excluded.end_date",
            (
                sprint.id,
                sprint.retrospective_id,
                &sprint.title,
                status,
                to_rfc3339(&sprint.start_date),
                to_rfc3339(&sprint.end_date),
            ),
        )
        .map_err(sqlite)?;
        summary.sprints += 1;
    }

    let now = to_rfc3339(&Utc::now());
    for task in &seed.sprint_tasks {
        tx.execute(
            "INSERT INTO sprint_tasks (id, sprint_id, key, summary, task_type, points_assigned, assignee_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) \
             ON CONFLICT(id) DO UPDATE SET sprint_id = excluded.sprint_id, key = excluded.key, summary = excluded.summary, \
             task_type = excluded.task_type, points_assigned = excluded.points_assigned, assignee_id = excluded.assignee_id, \
             updated_at = excluded.updated_at",
            (
                task.id,
                task.sprint_id,
                &task.key,
                &task.summary,
                &task.task_type,
                task.points_assigned,
                task.assignee_id,
                now.as_str(),
            ),
        )
        .map_err(sqlite)?;
        summary.sprint_tasks += 1;
    }

    tx.commit().map_err(sqlite)?;
    debug!(?summary, "seed committed");
    Ok(summary)
}

fn sqlite(err: rusqlite::Error) -> SeedError {
    SeedError::Sqlite {
        message: err.to_string(),
    }
}
