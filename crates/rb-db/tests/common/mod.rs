#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rb_core::RetroBoard;
use rb_core::types::{RetrospectiveId, SprintId, SprintTaskId, UserId};
use rb_db::schema::with_test_db;
use rb_db::seed::{SeedData, apply_seed};
use rb_db::store::DbStore;

pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, n, 0, 0, 0).unwrap()
}

pub fn user(id: i64) -> UserId {
    UserId::new(id).unwrap()
}

pub fn retro(id: i64) -> RetrospectiveId {
    RetrospectiveId::new(id).unwrap()
}

pub fn sprint(id: i64) -> SprintId {
    SprintId::new(id).unwrap()
}

pub fn task(id: i64) -> SprintTaskId {
    SprintTaskId::new(id).unwrap()
}

/// Retro 1 has members 1 and 2; user 3 belongs to retro 2 only.
///
/// Sprints of retro 1: 1 = day1..day10 (Active), 2 = day5..day20 (Active),
/// 3 = Draft, 4 = Completed, 6 = day3..day6 (Active). Sprint 5 belongs to retro 2.
pub fn board() -> RetroBoard<DbStore> {
    let conn = with_test_db().unwrap();
    let seed: SeedData = serde_json::from_value(serde_json::json!({
        "users": [
            {"id": 1, "firstName": "Grace", "lastName": "Hopper", "email": "grace@example.com"},
            {"id": 2, "firstName": "Alan", "lastName": "Turing", "email": "alan@example.com"},
            {"id": 3, "firstName": "Edsger", "lastName": "Dijkstra", "email": "edsger@example.com"}
        ],
        "retrospectives": [
            {"id": 1, "title": "Platform", "members": [1, 2]},
            {"id": 2, "title": "Mobile", "members": [3]}
        ],
        "sprints": [
            {"id": 1, "retrospectiveId": 1, "title": "S1", "status": "Active",
             "startDate": "2024-03-01T00:00:00Z", "endDate": "2024-03-10T00:00:00Z"},
            {"id": 2, "retrospectiveId": 1, "title": "S2", "status": "Active",
             "startDate": "2024-03-05T00:00:00Z", "endDate": "2024-03-20T00:00:00Z"},
            {"id": 3, "retrospectiveId": 1, "title": "S3", "status": "Draft",
             "startDate": "2024-03-21T00:00:00Z", "endDate": "2024-03-30T00:00:00Z"},
            {"id": 4, "retrospectiveId": 1, "title": "S0", "status": "Completed",
             "startDate": "2024-02-01T00:00:00Z", "endDate": "2024-02-14T00:00:00Z"},
            {"id": 5, "retrospectiveId": 2, "title": "M1", "status": "Active",
             "startDate": "2024-03-01T00:00:00Z", "endDate": "2024-03-10T00:00:00Z"},
            {"id": 6, "retrospectiveId": 1, "title": "S-short", "status": "Active",
             "startDate": "2024-03-03T00:00:00Z", "endDate": "2024-03-06T00:00:00Z"}
        ],
        "sprintTasks": [
            {"id": 1, "sprintId": 1, "key": "PLAT-1", "summary": "Cache warmup", "taskType": "Story", "pointsAssigned": 3.0, "assigneeId": 2},
            {"id": 2, "sprintId": 1, "key": "PLAT-2", "summary": "Fix flaky test", "taskType": "Bug", "pointsAssigned": 1.0},
            {"id": 3, "sprintId": 4, "key": "PLAT-0", "summary": "Old work", "taskType": "Story", "pointsAssigned": 2.0},
            {"id": 4, "sprintId": 5, "key": "MOB-1", "summary": "Login screen", "taskType": "Story", "pointsAssigned": 5.0}
        ]
    }))
    .unwrap();
    apply_seed(&conn, &seed).unwrap();
    RetroBoard::new(DbStore::new(conn))
}
