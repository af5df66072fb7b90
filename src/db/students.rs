use sqlx::SqlitePool;

use crate::models::Student;

const STUDENT_COLUMNS: &str =
    "id, student_id, name, email, password_hash, department, is_active, created_at";

pub async fn fetch_students(db: &SqlitePool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {} FROM students ORDER BY created_at DESC, rowid DESC",
        STUDENT_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_student_by_id(db: &SqlitePool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {} FROM students WHERE id = ?", STUDENT_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Lookup by the university-issued student id. `student_id` must already be
/// upper-cased.
pub async fn find_student_by_student_id(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {} FROM students WHERE student_id = ?",
        STUDENT_COLUMNS
    ))
    .bind(student_id)
    .fetch_optional(db)
    .await
}

pub async fn find_student_by_email(
    db: &SqlitePool,
    email: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {} FROM students WHERE email = ?", STUDENT_COLUMNS))
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn insert_student(db: &SqlitePool, student: &Student) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO students
            (id, student_id, name, email, password_hash, department, is_active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&student.id)
    .bind(&student.student_id)
    .bind(&student.name)
    .bind(&student.email)
    .bind(&student.password_hash)
    .bind(&student.department)
    .bind(student.is_active)
    .bind(&student.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update_student(db: &SqlitePool, student: &Student) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET name = ?1,
            email = ?2,
            password_hash = ?3,
            department = ?4,
            is_active = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&student.name)
    .bind(&student.email)
    .bind(&student.password_hash)
    .bind(&student.department)
    .bind(student.is_active)
    .bind(&student.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_student(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_in_memory, new_id, timestamp};
    use crate::error::is_unique_violation;

    fn student(student_id: &str, email: &str) -> Student {
        Student {
            id: new_id(),
            student_id: student_id.to_string(),
            name: "Ayesha Khan".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            department: "Computer Science".to_string(),
            is_active: true,
            created_at: timestamp(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup_student() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        let s = student("CS-2021-001", "ayesha@karachiuniversity.edu");
        insert_student(&pool, &s).await.expect("Failed to insert student");

        let found = find_student_by_student_id(&pool, "CS-2021-001")
            .await
            .unwrap()
            .expect("Student not found");
        assert_eq!(found.id, s.id);
        assert!(find_student_by_email(&pool, "ayesha@karachiuniversity.edu")
            .await
            .unwrap()
            .is_some());
        assert_eq!(fetch_students(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_student_id_and_email_are_unique() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        insert_student(&pool, &student("CS-2021-001", "a@karachiuniversity.edu")).await.unwrap();

        let err = insert_student(&pool, &student("CS-2021-001", "b@karachiuniversity.edu"))
            .await
            .expect_err("duplicate student id must fail");
        assert!(is_unique_violation(&err));

        let err = insert_student(&pool, &student("CS-2021-002", "a@karachiuniversity.edu"))
            .await
            .expect_err("duplicate email must fail");
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_update_and_delete_student() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        let mut s = student("CS-2021-003", "c@karachiuniversity.edu");
        insert_student(&pool, &s).await.unwrap();

        s.is_active = false;
        s.name = "Renamed".to_string();
        assert!(update_student(&pool, &s).await.unwrap());
        let stored = find_student_by_id(&pool, &s.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert!(!stored.is_active);

        assert!(delete_student(&pool, &s.id).await.unwrap());
        assert!(find_student_by_id(&pool, &s.id).await.unwrap().is_none());
    }
}
