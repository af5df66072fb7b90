use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatedFeedback {
    pub rating: i64,
    pub comment: String,
    pub course_name: String,
    pub semester: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSummary {
    pub teacher_name: String,
    /// Mean rating rounded to one decimal, e.g. `"4.0"`.
    pub average_rating: String,
    pub total_ratings: usize,
    pub courses: Vec<String>,
    pub feedbacks: Vec<RatedFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDetail {
    #[serde(flatten)]
    pub summary: TeacherSummary,
    /// Count of feedbacks per star value, keyed `"1"` through `"5"`.
    pub rating_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingQuery {
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub semester: Option<i64>,
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub search: Option<String>,
}
