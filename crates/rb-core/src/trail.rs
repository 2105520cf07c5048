use crate::error::RetroError;
use crate::types::{NewTrailEntry, TrailEntry, UserId};

pub trait TrailRepository {
    fn append(&self, entry: NewTrailEntry) -> Result<TrailEntry, RetroError>;
    fn list(&self, entity_name: &str, entity_id: &str) -> Result<Vec<TrailEntry>, RetroError>;
}

/// Audit sink for mutating actions. Recording never fails the caller.
pub trait TrailService {
    fn add(
        &self,
        action: &str,
        entity_name: &str,
        entity_id: &str,
        user_id: UserId,
        correlation_id: Option<String>,
    );
}
