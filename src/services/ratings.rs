use std::collections::{BTreeMap, HashMap, HashSet};

use sqlx::SqlitePool;

use crate::db::feedback;
use crate::error::AppError;
use crate::models::feedback::{MAX_RATING, MIN_RATING};
use crate::models::{Course, FeedbackView, RatedFeedback, RatingQuery, TeacherDetail, TeacherSummary};

pub struct RatingService {
    db: SqlitePool,
}

impl RatingService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn teacher_ratings(&self, query: &RatingQuery) -> Result<Vec<TeacherSummary>, AppError> {
        let rows = feedback::fetch_rated_views(&self.db, query.semester).await?;
        Ok(aggregate(rows, query.search.as_deref()))
    }

    pub async fn teacher_detail(&self, teacher_name: &str) -> Result<TeacherDetail, AppError> {
        let rows = feedback::fetch_rated_views(&self.db, None).await?;
        detail_for(rows, teacher_name)
            .ok_or_else(|| AppError::NotFound("No ratings found for this teacher".to_string()))
    }
}

struct Group {
    teacher_name: String,
    total_score: i64,
    courses: Vec<String>,
    seen_courses: HashSet<String>,
    feedbacks: Vec<RatedFeedback>,
}

impl Group {
    fn new(teacher_name: String) -> Self {
        Self {
            teacher_name,
            total_score: 0,
            courses: Vec::new(),
            seen_courses: HashSet::new(),
            feedbacks: Vec::new(),
        }
    }

    fn push(&mut self, course_name: String, semester: i64, rating: i64, comment: String, created_at: String) {
        let label = Course::label(&course_name, semester);
        if self.seen_courses.insert(label.clone()) {
            self.courses.push(label);
        }
        self.total_score += rating;
        self.feedbacks.push(RatedFeedback {
            rating,
            comment,
            course_name,
            semester,
            created_at,
        });
    }

    fn into_summary(mut self) -> (f64, TeacherSummary) {
        let count = self.feedbacks.len();
        let average = round_one_decimal(self.total_score as f64 / count as f64);
        self.feedbacks
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));

        (
            average,
            TeacherSummary {
                teacher_name: self.teacher_name,
                average_rating: format!("{:.1}", average),
                total_ratings: count,
                courses: self.courses,
                feedbacks: self.feedbacks,
            },
        )
    }
}

/// Half-up rounding to one decimal, so 3.25 reports as 3.3.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Groups joined feedback rows by teacher name and ranks the teachers by
/// average rating, highest first. Rows without a course are skipped. Teachers
/// with equal averages keep the order in which they were first seen.
pub fn aggregate(rows: Vec<FeedbackView>, search: Option<&str>) -> Vec<TeacherSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        let (Some(teacher), Some(course_name), Some(semester)) = (row.teacher, row.course_name, row.semester) else {
            continue;
        };
        let slot = *index.entry(teacher.clone()).or_insert_with(|| {
            groups.push(Group::new(teacher));
            groups.len() - 1
        });
        groups[slot].push(course_name, semester, row.rating, row.comment, row.created_at);
    }

    let needle = search.map(str::to_lowercase);
    let mut ranked: Vec<(f64, TeacherSummary)> = groups
        .into_iter()
        .map(Group::into_summary)
        .filter(|(_, summary)| match &needle {
            Some(needle) => summary.teacher_name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().map(|(_, summary)| summary).collect()
}

/// Summary plus star distribution for one exact teacher name.
pub fn detail_for(rows: Vec<FeedbackView>, teacher_name: &str) -> Option<TeacherDetail> {
    let rows: Vec<FeedbackView> = rows
        .into_iter()
        .filter(|row| row.teacher.as_deref() == Some(teacher_name))
        .collect();

    let mut rating_distribution: BTreeMap<String, usize> =
        (MIN_RATING..=MAX_RATING).map(|r| (r.to_string(), 0)).collect();
    for row in &rows {
        if let Some(count) = rating_distribution.get_mut(&row.rating.to_string()) {
            *count += 1;
        }
    }

    let summary = aggregate(rows, None).into_iter().next()?;
    Some(TeacherDetail {
        summary,
        rating_distribution,
    })
}
