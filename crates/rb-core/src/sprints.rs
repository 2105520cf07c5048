use crate::error::RetroError;
use crate::types::{Sprint, SprintId};

pub trait SprintRepository {
    fn get(&self, id: SprintId) -> Result<Option<Sprint>, RetroError>;
}
