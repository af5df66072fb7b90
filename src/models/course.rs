use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEPARTMENTS: [&str; 2] = ["Computer Science", "Software Engineering"];
pub const MIN_SEMESTER: i64 = 1;
pub const MAX_SEMESTER: i64 = 8;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub course_name: String,
    pub teacher: String,
    pub semester: i64,
    pub department: String,
    pub is_active: bool,
    pub created_at: String,
}

impl Course {
    /// Label used when listing the courses a teacher has been rated for.
    pub fn label(course_name: &str, semester: i64) -> String {
        format!("{} (Sem {})", course_name, semester)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    pub course_name: Option<String>,
    pub teacher: Option<String>,
    pub semester: Option<i64>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub course_name: Option<String>,
    pub teacher: Option<String>,
    pub semester: Option<i64>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilter {
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub semester: Option<i64>,
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub department: Option<String>,
}
