use std::env;
use std::net::SocketAddr;

use crate::error::AppError;

pub const DEFAULT_EMAIL_DOMAIN: &str = "karachiuniversity.edu";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub allowed_email_domain: String,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn new_from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://feedback.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("JWT_SECRET is not set".to_string()))?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|e| AppError::BadRequest(format!("BIND_ADDR is invalid: {}", e)))?;

        let allowed_email_domain = env::var("ALLOWED_EMAIL_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_EMAIL_DOMAIN.to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            allowed_email_domain,
        })
    }

    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: jwt_secret.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            allowed_email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
        }
    }
}
