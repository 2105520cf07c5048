pub mod feedback_repo;
pub mod member_repo;
pub mod schema;
pub mod seed;
pub mod sprint_repo;
pub mod sprint_task_repo;
pub mod store;
pub mod trail_repo;
pub mod util;
