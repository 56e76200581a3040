use std::sync::Arc;

use contracts::domain::a003_emergency_call::lifecycle::ReleasePolicy;
use sea_orm::DatabaseConnection;

use super::config::Config;

/// Everything a handler needs, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub jwt_secret: Arc<String>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, jwt_secret: String) -> Self {
        Self {
            db,
            config: Arc::new(config),
            jwt_secret: Arc::new(jwt_secret),
        }
    }

    pub fn release_policy(&self) -> ReleasePolicy {
        self.config.dispatch.release_policy
    }
}
