pub mod admin;
pub mod course;
pub mod feedback;
pub mod rating;
pub mod student;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, de};

pub use admin::{Admin, AdminLoginRequest, AdminProfile};
pub use course::{Course, CourseFilter, NewCourseRequest, UpdateCourseRequest};
pub use feedback::{Feedback, FeedbackFilter, FeedbackView, SubmitFeedbackRequest};
pub use rating::{RatedFeedback, RatingQuery, TeacherDetail, TeacherSummary};
pub use student::{
    RegisterStudentRequest, Student, StudentBadge, StudentLoginRequest, UpdateStudentRequest,
    VerifyStudentRequest,
};

/// Treats `?semester=` the same as an absent parameter.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}
