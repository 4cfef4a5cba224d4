//! Storage seams for accounts and tasks.
//!
//! Handlers only see these traits. `postgres` backs them with sqlx in production,
//! `memory` keeps everything in process for tests and local experiments.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskQuery, TaskStatus, User};

/// Message for a signup whose email already belongs to an account.
pub const EMAIL_TAKEN: &str = "Email already registered";

pub use memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use postgres::{PgTaskRepository, PgUserRepository};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account. Fails with `BadRequest` if the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Tasks owned by `user_id`, newest first, filtered and paginated by `query`.
    async fn list_for_user(&self, user_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    async fn count_for_user(
        &self,
        user_id: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<i64, AppError>;

    async fn create(&self, task: Task) -> Result<Task, AppError>;

    async fn find(&self, task_id: Uuid) -> Result<Option<Task>, AppError>;

    /// Persists every mutable field of `task` and returns the stored row.
    async fn update(&self, task: &Task) -> Result<Task, AppError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, task_id: Uuid) -> Result<bool, AppError>;
}
