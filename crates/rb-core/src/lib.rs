pub mod board;
pub mod error;
pub mod feedback;
pub mod members;
pub mod permissions;
pub mod sprint_tasks;
pub mod sprints;
pub mod store;
pub mod trail;
pub mod validation;

pub mod types;

pub use crate::board::RetroBoard;
pub use crate::error::RetroError;
pub use crate::permissions::PermissionService;
pub use crate::store::Store;
pub use crate::trail::TrailService;
