use sqlx::SqlitePool;
use tracing::info;

use crate::db::{courses, new_id, timestamp};
use crate::error::{AppError, conflict_on_unique};
use crate::models::{Course, CourseFilter, NewCourseRequest, UpdateCourseRequest};
use crate::services::validation::{ALL_FIELDS_REQUIRED, present, validate_department, validate_semester};

pub const DUPLICATE_COURSE: &str = "This course already exists in this semester";

fn course_not_found() -> AppError {
    AppError::NotFound("Course not found".to_string())
}

pub struct CatalogService {
    db: SqlitePool,
}

impl CatalogService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &CourseFilter) -> Result<Vec<Course>, AppError> {
        Ok(courses::fetch_courses(&self.db, filter).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Course, AppError> {
        courses::find_course_by_id(&self.db, id)
            .await?
            .ok_or_else(course_not_found)
    }

    pub async fn create(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        let (Some(course_name), Some(teacher), Some(semester), Some(department)) = (
            present(req.course_name.as_deref()),
            present(req.teacher.as_deref()),
            req.semester,
            present(req.department.as_deref()),
        ) else {
            return Err(AppError::BadRequest(ALL_FIELDS_REQUIRED.to_string()));
        };

        let course = Course {
            id: new_id(),
            course_name,
            teacher,
            semester: validate_semester(semester)?,
            department: validate_department(&department)?,
            is_active: true,
            created_at: timestamp(),
        };

        courses::insert_course(&self.db, &course)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_COURSE))?;

        info!("course {} ({}) added", course.id, course.course_name);
        Ok(course)
    }

    /// Applies only the fields present in `req`; blank strings leave the
    /// stored value untouched.
    pub async fn update(&self, id: &str, req: UpdateCourseRequest) -> Result<Course, AppError> {
        let mut course = self.get(id).await?;

        if let Some(course_name) = present(req.course_name.as_deref()) {
            course.course_name = course_name;
        }
        if let Some(teacher) = present(req.teacher.as_deref()) {
            course.teacher = teacher;
        }
        if let Some(semester) = req.semester {
            course.semester = validate_semester(semester)?;
        }
        if let Some(department) = present(req.department.as_deref()) {
            course.department = validate_department(&department)?;
        }
        if let Some(is_active) = req.is_active {
            course.is_active = is_active;
        }

        let updated = courses::update_course(&self.db, &course)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_COURSE))?;
        if !updated {
            return Err(course_not_found());
        }

        info!("course {} updated", course.id);
        Ok(course)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if courses::delete_course(&self.db, id).await? {
            info!("course {} deleted", id);
            Ok(())
        } else {
            Err(course_not_found())
        }
    }
}
