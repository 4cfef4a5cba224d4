use std::sync::Arc;

use crate::auth::Credentials;
use crate::repository::{TaskRepository, UserRepository};

/// Shared application state handed to every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub credentials: Credentials,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        credentials: Credentials,
    ) -> Self {
        Self {
            users,
            tasks,
            credentials,
        }
    }
}
