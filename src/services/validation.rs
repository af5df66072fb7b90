//! Input checks that run before anything touches storage. The unique indexes
//! in the schema back up the duplicate checks made on top of these.

use crate::auth::password::MIN_PASSWORD_LEN;
use crate::error::AppError;
use crate::models::course::{DEPARTMENTS, MAX_SEMESTER, MIN_SEMESTER};
use crate::models::feedback::{MAX_RATING, MIN_RATING};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Trims and rejects blank values.
pub fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn normalize_student_id(student_id: &str) -> String {
    student_id.trim().to_uppercase()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Only whole stars in range are accepted; NaN from unparsable text fails.
pub fn validate_rating(rating: f64) -> Result<i64, AppError> {
    if rating.fract() != 0.0 || rating < MIN_RATING as f64 || rating > MAX_RATING as f64 {
        return Err(AppError::BadRequest(format!(
            "Rating must be an integer between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(rating as i64)
}

pub fn validate_semester(semester: i64) -> Result<i64, AppError> {
    if !(MIN_SEMESTER..=MAX_SEMESTER).contains(&semester) {
        return Err(AppError::BadRequest(format!(
            "Semester must be between {} and {}",
            MIN_SEMESTER, MAX_SEMESTER
        )));
    }
    Ok(semester)
}

pub fn validate_department(department: &str) -> Result<String, AppError> {
    DEPARTMENTS
        .iter()
        .find(|d| **d == department.trim())
        .map(|d| d.to_string())
        .ok_or_else(|| {
            AppError::BadRequest(format!("Department must be one of: {}", DEPARTMENTS.join(", ")))
        })
}

/// Lower-cases the address and checks it belongs to `domain`.
pub fn validate_email(email: &str, domain: &str) -> Result<String, AppError> {
    let email = normalize_email(email);
    let suffix = format!("@{}", domain.to_lowercase());
    if email.len() <= suffix.len() || !email.ends_with(&suffix) {
        return Err(AppError::BadRequest(format!(
            "Please use your university email (@{})",
            domain
        )));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
