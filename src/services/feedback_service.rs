use sqlx::SqlitePool;
use tracing::info;

use crate::db::{courses, feedback, new_id, students, timestamp};
use crate::error::{AppError, conflict_on_unique};
use crate::models::{Feedback, FeedbackFilter, FeedbackView, SubmitFeedbackRequest};
use crate::services::validation::{ALL_FIELDS_REQUIRED, normalize_student_id, present, validate_rating};

pub const INVALID_STUDENT: &str = "Invalid student ID";
pub const INVALID_COURSE: &str = "Invalid or inactive course";
pub const ALREADY_SUBMITTED: &str = "You have already submitted feedback for this course";

/// Inserts a validated submission. A concurrent submission for the same pair
/// can pass the duplicate check in `submit`; the unique index then turns the
/// loser into the same conflict.
pub(crate) async fn store_new_feedback(db: &SqlitePool, record: &Feedback) -> Result<(), AppError> {
    feedback::insert_feedback(db, record)
        .await
        .map_err(|e| conflict_on_unique(e, ALREADY_SUBMITTED))
}

pub struct FeedbackService {
    db: SqlitePool,
}

impl FeedbackService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Validates and stores one submission. Checks run in a fixed order:
    /// presence, rating range, student, course, then the duplicate rule.
    pub async fn submit(&self, req: SubmitFeedbackRequest) -> Result<Feedback, AppError> {
        let (Some(student_id), Some(course_id), Some(rating), Some(comment)) = (
            present(req.student_id.as_deref()),
            present(req.course_id.as_deref()),
            req.rating,
            present(req.comment.as_deref()),
        ) else {
            return Err(AppError::BadRequest(ALL_FIELDS_REQUIRED.to_string()));
        };
        let rating = validate_rating(rating)?;
        let student_id = normalize_student_id(&student_id);

        match students::find_student_by_student_id(&self.db, &student_id).await? {
            Some(student) if student.is_active => {}
            _ => return Err(AppError::BadRequest(INVALID_STUDENT.to_string())),
        }

        match courses::find_course_by_id(&self.db, &course_id).await? {
            Some(course) if course.is_active => {}
            _ => return Err(AppError::BadRequest(INVALID_COURSE.to_string())),
        }

        if feedback::find_feedback_by_student_and_course(&self.db, &student_id, &course_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(ALREADY_SUBMITTED.to_string()));
        }

        let record = Feedback {
            id: new_id(),
            student_id,
            course_id,
            rating,
            comment,
            created_at: timestamp(),
        };

        store_new_feedback(&self.db, &record).await?;

        info!(
            "feedback {} stored for student {} on course {}",
            record.id, record.student_id, record.course_id
        );
        Ok(record)
    }

    pub async fn list_all(&self, filter: &FeedbackFilter) -> Result<Vec<FeedbackView>, AppError> {
        Ok(feedback::fetch_feedback_views(&self.db, filter).await?)
    }

    pub async fn list_for_student(&self, student_id: &str) -> Result<Vec<FeedbackView>, AppError> {
        let student_id = normalize_student_id(student_id);
        Ok(feedback::fetch_feedback_views_by_student(&self.db, &student_id).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if feedback::delete_feedback(&self.db, id).await? {
            info!("feedback {} deleted", id);
            Ok(())
        } else {
            Err(AppError::NotFound("Feedback not found".to_string()))
        }
    }
}
