use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: String,
}

/// A feedback row joined with its course. The course columns are `None` when
/// the referenced course has been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: String,
    pub course_name: Option<String>,
    pub teacher: Option<String>,
    pub semester: Option<i64>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingInput {
    Number(f64),
    Text(String),
}

/// Accepts `5` or `"5"`. A blank string counts as missing; any other text
/// becomes NaN so the range check rejects it with the usual message.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RatingInput>::deserialize(deserializer)? {
        None => None,
        Some(RatingInput::Number(n)) => Some(n),
        Some(RatingInput::Text(text)) => match text.trim() {
            "" => None,
            t => Some(t.parse().unwrap_or(f64::NAN)),
        },
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFilter {
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub semester: Option<i64>,
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub teacher: Option<String>,
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub course_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating_of(value: serde_json::Value) -> Option<f64> {
        serde_json::from_value::<SubmitFeedbackRequest>(json!({ "rating": value }))
            .unwrap()
            .rating
    }

    #[test]
    fn rating_accepts_numbers_and_numeric_strings() {
        assert_eq!(rating_of(json!(4)), Some(4.0));
        assert_eq!(rating_of(json!("5")), Some(5.0));
        assert_eq!(rating_of(json!(" 3 ")), Some(3.0));
        assert_eq!(rating_of(json!("")), None);
        assert_eq!(rating_of(json!(null)), None);
        assert!(rating_of(json!("five")).unwrap().is_nan());

        let absent: SubmitFeedbackRequest = serde_json::from_value(json!({})).unwrap();
        assert!(absent.rating.is_none());
    }
}
