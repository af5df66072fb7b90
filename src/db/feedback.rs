use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{Feedback, FeedbackFilter, FeedbackView};

const VIEW_SELECT: &str = r#"
    SELECT
        f.id, f.student_id, f.course_id, f.rating, f.comment, f.created_at,
        c.course_name, c.teacher, c.semester, c.department
    FROM feedback f
    LEFT JOIN courses c ON c.id = f.course_id
"#;

const NEWEST_FIRST: &str = " ORDER BY f.created_at DESC, f.rowid DESC";

/// Every feedback row with its course columns, newest first.
///
/// The teacher filter is a case-insensitive substring match applied after the
/// fetch: SQLite's `lower()` only folds ASCII.
pub async fn fetch_feedback_views(
    db: &SqlitePool,
    filter: &FeedbackFilter,
) -> Result<Vec<FeedbackView>, sqlx::Error> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(VIEW_SELECT);
    query.push(" WHERE 1 = 1");
    if let Some(semester) = filter.semester {
        query.push(" AND c.semester = ").push_bind(semester);
    }
    if let Some(course_id) = &filter.course_id {
        query.push(" AND f.course_id = ").push_bind(course_id.clone());
    }
    query.push(NEWEST_FIRST);

    let rows = query.build_query_as::<FeedbackView>().fetch_all(db).await?;

    Ok(match &filter.teacher {
        Some(teacher) => {
            let needle = teacher.to_lowercase();
            rows.into_iter()
                .filter(|row| {
                    row.teacher
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
                })
                .collect()
        }
        None => rows,
    })
}

pub async fn fetch_feedback_views_by_student(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<FeedbackView>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackView>(&format!(
        "{} WHERE f.student_id = ? {}",
        VIEW_SELECT, NEWEST_FIRST
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
}

/// Feedback whose course still exists, for aggregation. Orphans are dropped
/// by the inner join.
pub async fn fetch_rated_views(
    db: &SqlitePool,
    semester: Option<i64>,
) -> Result<Vec<FeedbackView>, sqlx::Error> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT
            f.id, f.student_id, f.course_id, f.rating, f.comment, f.created_at,
            c.course_name, c.teacher, c.semester, c.department
        FROM feedback f
        INNER JOIN courses c ON c.id = f.course_id
        "#,
    );
    if let Some(semester) = semester {
        query.push(" WHERE c.semester = ").push_bind(semester);
    }
    query.push(NEWEST_FIRST);

    query.build_query_as::<FeedbackView>().fetch_all(db).await
}

pub async fn find_feedback_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Feedback>, sqlx::Error> {
    sqlx::query_as::<_, Feedback>(
        "SELECT id, student_id, course_id, rating, comment, created_at FROM feedback WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_feedback_by_student_and_course(
    db: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<Option<Feedback>, sqlx::Error> {
    sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, student_id, course_id, rating, comment, created_at
        FROM feedback
        WHERE student_id = ?1 AND course_id = ?2
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

/// Plain insert; a second row for the same (student, course) pair fails with
/// a unique violation from `idx_feedback_student_course`.
pub async fn insert_feedback(db: &SqlitePool, feedback: &Feedback) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO feedback
            (id, student_id, course_id, rating, comment, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&feedback.id)
    .bind(&feedback.student_id)
    .bind(&feedback.course_id)
    .bind(feedback.rating)
    .bind(&feedback.comment)
    .bind(&feedback.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_feedback(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM feedback WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::courses::{delete_course, insert_course};
    use crate::db::{connect_in_memory, new_id, timestamp};
    use crate::error::is_unique_violation;
    use crate::models::Course;

    async fn seed_course(pool: &SqlitePool, name: &str, teacher: &str, semester: i64) -> Course {
        let course = Course {
            id: new_id(),
            course_name: name.to_string(),
            teacher: teacher.to_string(),
            semester,
            department: "Computer Science".to_string(),
            is_active: true,
            created_at: timestamp(),
        };
        insert_course(pool, &course).await.expect("Failed to insert course");
        course
    }

    fn feedback(student_id: &str, course_id: &str, rating: i64, created_at: &str) -> Feedback {
        Feedback {
            id: new_id(),
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            rating,
            comment: "ok".to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_storage_rejects_second_submission_for_pair() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let course = seed_course(&pool, "Data Structures", "Ms X", 3).await;

        insert_feedback(&pool, &feedback("CS-2021-001", &course.id, 5, &timestamp()))
            .await
            .expect("first submission");
        let err = insert_feedback(&pool, &feedback("CS-2021-001", &course.id, 4, &timestamp()))
            .await
            .expect_err("second submission must fail");
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_storage_rejects_out_of_range_rating() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let course = seed_course(&pool, "Data Structures", "Ms X", 3).await;

        for rating in [0, 6] {
            let result =
                insert_feedback(&pool, &feedback("CS-2021-001", &course.id, rating, &timestamp()))
                    .await;
            assert!(result.is_err(), "rating {} must be rejected", rating);
        }
    }

    #[tokio::test]
    async fn test_student_listing_is_newest_first() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let a = seed_course(&pool, "A", "T1", 1).await;
        let b = seed_course(&pool, "B", "T1", 1).await;
        let c = seed_course(&pool, "C", "T2", 2).await;

        insert_feedback(&pool, &feedback("S1", &b.id, 3, "2025-01-02T00:00:00.000000Z")).await.unwrap();
        insert_feedback(&pool, &feedback("S1", &a.id, 4, "2025-01-01T00:00:00.000000Z")).await.unwrap();
        insert_feedback(&pool, &feedback("S1", &c.id, 5, "2025-01-03T00:00:00.000000Z")).await.unwrap();
        insert_feedback(&pool, &feedback("S2", &a.id, 1, "2025-01-04T00:00:00.000000Z")).await.unwrap();

        let views = fetch_feedback_views_by_student(&pool, "S1").await.unwrap();
        let names: Vec<_> = views.iter().map(|v| v.course_name.clone().unwrap()).collect();
        assert_eq!(names, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_orphans_are_listed_with_null_course_and_skipped_for_rating() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let kept = seed_course(&pool, "Kept", "Ms X", 1).await;
        let gone = seed_course(&pool, "Gone", "Mr Y", 2).await;

        insert_feedback(&pool, &feedback("S1", &kept.id, 5, &timestamp())).await.unwrap();
        insert_feedback(&pool, &feedback("S1", &gone.id, 2, &timestamp())).await.unwrap();
        delete_course(&pool, &gone.id).await.unwrap();

        let all = fetch_feedback_views(&pool, &FeedbackFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        let orphan = all.iter().find(|v| v.course_id == gone.id).expect("orphan listed");
        assert!(orphan.course_name.is_none());
        assert!(orphan.teacher.is_none());

        let rated = fetch_rated_views(&pool, None).await.unwrap();
        assert_eq!(rated.len(), 1);
        assert_eq!(rated[0].course_id, kept.id);

        let by_teacher = fetch_feedback_views(
            &pool,
            &FeedbackFilter { teacher: Some("ms x".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(by_teacher.len(), 1);
    }

    #[tokio::test]
    async fn test_teacher_filter_folds_non_ascii_case() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let umran = seed_course(&pool, "Compilers", "Dr Ümran Öz", 6).await;
        let other = seed_course(&pool, "Networks", "Mr Y", 6).await;

        insert_feedback(&pool, &feedback("S1", &umran.id, 4, &timestamp())).await.unwrap();
        insert_feedback(&pool, &feedback("S1", &other.id, 2, &timestamp())).await.unwrap();

        for needle in ["ümran", "ÜMRAN ÖZ", "Öz"] {
            let hits = fetch_feedback_views(
                &pool,
                &FeedbackFilter { teacher: Some(needle.to_string()), ..Default::default() },
            )
            .await
            .unwrap();
            assert_eq!(hits.len(), 1, "needle {:?}", needle);
            assert_eq!(hits[0].course_id, umran.id);
        }
    }

    #[tokio::test]
    async fn test_delete_feedback() {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        let course = seed_course(&pool, "A", "T", 1).await;
        let f = feedback("S1", &course.id, 3, &timestamp());
        insert_feedback(&pool, &f).await.unwrap();

        assert!(delete_feedback(&pool, &f.id).await.unwrap());
        assert!(!delete_feedback(&pool, &f.id).await.unwrap());
        assert!(find_feedback_by_id(&pool, &f.id).await.unwrap().is_none());
    }
}
