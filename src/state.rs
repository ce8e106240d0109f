use std::sync::Arc;

use chrono::Duration;

use crate::auth::{AuthService, PasswordHasher, TokenService};
use crate::config::Config;
use crate::store::{CredentialStore, TaskStore};
use crate::tasks::TaskService;

/// Shared application state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub tokens: TokenService,
    pub users: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), tokens.clone(), hasher),
            tasks: TaskService::new(tasks),
            tokens,
            users,
        }
    }

    /// Wires services from configuration around already-built stores.
    pub fn from_config(
        config: &Config,
        users: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        Self::new(
            users,
            tasks,
            TokenService::new(&config.jwt_secret, Duration::days(config.token_ttl_days)),
            PasswordHasher::new(config.bcrypt_cost),
        )
    }
}
