use std::sync::Arc;

use chrono::Duration;

use crate::auth::{TokenService, TOKEN_LIFETIME_HOURS};
use crate::config::AppConfig;
use crate::database::{
    CategoryRepository, MemoryStore, PgStore, TodoRepository, UserRepository,
};
use crate::services::{CategoryService, CredentialService, TodoService};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub credentials: CredentialService,
    pub categories: CategoryService,
    pub todos: TodoService,
    users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        todos: Arc<dyn TodoRepository>,
    ) -> Self {
        Self {
            tokens,
            credentials: CredentialService::new(users.clone()),
            categories: CategoryService::new(categories.clone()),
            todos: TodoService::new(todos, categories),
            users,
        }
    }

    /// State backed by PostgreSQL
    pub fn with_pg(store: PgStore, config: &AppConfig) -> Self {
        let store = Arc::new(store);
        Self::new(
            TokenService::from_config(&config.security),
            store.clone(),
            store.clone(),
            store,
        )
    }

    /// State backed by the in-process store
    pub fn with_memory_store(store: MemoryStore, jwt_secret: &str) -> Self {
        let store = Arc::new(store);
        Self::new(
            TokenService::new(jwt_secret, Duration::hours(TOKEN_LIFETIME_HOURS)),
            store.clone(),
            store.clone(),
            store,
        )
    }

    /// Round-trips the backing store
    pub async fn ping(&self) -> bool {
        match self.users.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Store health check failed: {}", e);
                false
            }
        }
    }
}
