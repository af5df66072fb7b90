pub mod admins;
pub mod courses;
pub mod feedback;
pub mod students;

use std::str::FromStr;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::AppError;

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Opens an existing database read-only, without creating the file or running
/// migrations.
pub async fn connect_read_only(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(false)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Whether the migrations have created the catalog tables yet.
pub async fn has_schema(db: &SqlitePool) -> Result<bool, AppError> {
    let found: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'courses'",
    )
    .fetch_optional(db)
    .await?;

    Ok(found.is_some())
}

/// A single-connection in-memory database with migrations applied. Every
/// connection to `sqlite::memory:` is its own database, so the pool must
/// never open a second one or recycle the first.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// RFC 3339 in UTC with fixed microsecond precision, so stored timestamps
/// order correctly as plain strings.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_only_open_never_creates_the_file() {
        let path = std::env::temp_dir().join(format!("course-feedback-{}.db", new_id()));
        let url = format!("sqlite://{}?mode=rwc", path.display());

        assert!(connect_read_only(&url).await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_schema_detection() {
        let migrated = connect_in_memory().await.expect("Failed to create test db");
        assert!(has_schema(&migrated).await.unwrap());

        let bare = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        assert!(!has_schema(&bare).await.unwrap());
    }
}
