use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskRepository, UserRepository, EMAIL_TAKEN};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskQuery, TaskStatus, User};

/// Process-local account store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == new_user.email) {
            return Err(AppError::BadRequest(EMAIL_TAKEN.into()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: Some(new_user.name),
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

/// Process-local task store.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

fn matches_filter(task: &Task, user_id: Uuid, status: Option<TaskStatus>) -> bool {
    task.user_id == user_id && status.map_or(true, |status| task.status == status)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_for_user(&self, user_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|task| matches_filter(task, user_id, query.status))
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(owned
            .into_iter()
            .skip(query.skip.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn count_for_user(
        &self,
        user_id: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<i64, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|task| matches_filter(task, user_id, status))
            .count() as i64)
    }

    async fn create(&self, task: Task) -> Result<Task, AppError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find(&self, task_id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&task_id).cloned())
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let stored = tasks
            .get_mut(&task.id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.status = task.status;
        stored.priority = task.priority;
        stored.completed = task.completed;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, task_id: Uuid) -> Result<bool, AppError> {
        Ok(self.tasks.write().await.remove(&task_id).is_some())
    }
}
