use sqlx::SqlitePool;

use crate::models::Admin;

pub async fn find_admin_by_id(db: &SqlitePool, id: &str) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(
        "SELECT id, email, password_hash, created_at FROM admins WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_admin_by_email(
    db: &SqlitePool,
    email: &str,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(
        "SELECT id, email, password_hash, created_at FROM admins WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn insert_admin(db: &SqlitePool, admin: &Admin) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO admins (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&admin.id)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.created_at)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_in_memory, new_id, timestamp};

    #[tokio::test]
    async fn test_insert_and_find_admin() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        let admin = Admin {
            id: new_id(),
            email: "admin@s.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: timestamp(),
        };
        insert_admin(&pool, &admin).await.expect("Failed to insert admin");

        let by_email = find_admin_by_email(&pool, "admin@s.com")
            .await
            .expect("Failed to query admin")
            .expect("Admin not found");
        assert_eq!(by_email.id, admin.id);

        let by_id = find_admin_by_id(&pool, &admin.id).await.expect("Failed to query admin");
        assert!(by_id.is_some());
        assert!(find_admin_by_id(&pool, "missing").await.unwrap().is_none());
    }
}
