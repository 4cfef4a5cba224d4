use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{TaskRepository, UserRepository, EMAIL_TAKEN};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskQuery, TaskStatus, User};

const UNIQUE_VIOLATION: &str = "23505";
const USER_COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, completed, created_at, updated_at";

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, email, name, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.name)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // Unique index on email; a concurrent signup lost the race.
                if is_unique_violation(&e) {
                    AppError::BadRequest(EMAIL_TAKEN.into())
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list_for_user(&self, user_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
        let mut param_count = 2;

        if query.status.is_some() {
            sql.push_str(&format!(" AND status = ${}", param_count));
            param_count += 1;
        }
        sql.push_str(&format!(
            " ORDER BY created_at DESC, id DESC OFFSET ${} LIMIT ${}",
            param_count,
            param_count + 1
        ));

        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(user_id);
        if let Some(status) = query.status {
            query_builder = query_builder.bind(status);
        }
        let tasks = query_builder
            .bind(query.skip)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn count_for_user(
        &self,
        user_id: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<i64, AppError> {
        let total = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND status = $2",
                )
                .bind(user_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(total)
    }

    async fn create(&self, task: Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, user_id, title, description, status, priority, completed, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.user_id)
            .bind(task.title)
            .bind(task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.completed)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find(&self, task_id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks
             SET title = $1, description = $2, status = $3, priority = $4, completed = $5, updated_at = NOW()
             WHERE id = $6
             RETURNING {}",
            TASK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.completed)
            .bind(task.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => AppError::NotFound("Task not found".into()),
                other => AppError::from(other),
            })?;
        Ok(updated)
    }

    async fn delete(&self, task_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
