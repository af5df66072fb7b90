use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenSigner;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tokens: TokenSigner,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let tokens = TokenSigner::new(&config.jwt_secret);
        Self {
            db,
            config: Arc::new(config),
            tokens,
        }
    }
}
