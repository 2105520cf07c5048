pub mod enums;
pub mod feedback;
pub mod ids;
pub mod io;
pub mod sprint;
pub mod sprint_task;
pub mod trail;
pub mod user;

pub use enums::*;
pub use feedback::*;
pub use ids::*;
pub use io::*;
pub use sprint::*;
pub use sprint_task::*;
pub use trail::*;
pub use user::*;
