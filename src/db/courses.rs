use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{Course, CourseFilter};

const COURSE_COLUMNS: &str =
    "id, course_name, teacher, semester, department, is_active, created_at";

/// Active courses ordered by semester, then name.
pub async fn fetch_courses(db: &SqlitePool, filter: &CourseFilter) -> Result<Vec<Course>, sqlx::Error> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM courses WHERE is_active = 1",
        COURSE_COLUMNS
    ));
    if let Some(semester) = filter.semester {
        query.push(" AND semester = ").push_bind(semester);
    }
    if let Some(department) = &filter.department {
        query.push(" AND department = ").push_bind(department.clone());
    }
    query.push(" ORDER BY semester ASC, course_name ASC");

    query.build_query_as::<Course>().fetch_all(db).await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_course_by_key(
    db: &SqlitePool,
    course_name: &str,
    semester: i64,
    department: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM courses WHERE course_name = ? AND semester = ? AND department = ?",
        COURSE_COLUMNS
    ))
    .bind(course_name)
    .bind(semester)
    .bind(department)
    .fetch_optional(db)
    .await
}

pub async fn insert_course(db: &SqlitePool, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO courses
            (id, course_name, teacher, semester, department, is_active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&course.id)
    .bind(&course.course_name)
    .bind(&course.teacher)
    .bind(course.semester)
    .bind(&course.department)
    .bind(course.is_active)
    .bind(&course.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update_course(db: &SqlitePool, course: &Course) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET course_name = ?1,
            teacher = ?2,
            semester = ?3,
            department = ?4,
            is_active = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&course.course_name)
    .bind(&course.teacher)
    .bind(course.semester)
    .bind(&course.department)
    .bind(course.is_active)
    .bind(&course.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

/// Hard delete. Feedback that referenced the course is left in place.
pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
