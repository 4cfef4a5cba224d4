pub mod task;
pub mod user;

pub use task::{Pagination, Task, TaskInput, TaskPage, TaskPriority, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{NewUser, User};
