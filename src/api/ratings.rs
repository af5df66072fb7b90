use axum::Json;
use axum::extract::State;

use crate::api::extract::{AppPath, AppQuery};
use crate::error::AppError;
use crate::models::{RatingQuery, TeacherDetail, TeacherSummary};
use crate::services::RatingService;
use crate::state::AppState;

pub async fn teacher_ratings(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RatingQuery>,
) -> Result<Json<Vec<TeacherSummary>>, AppError> {
    let ratings = RatingService::new(state.db.clone()).teacher_ratings(&query).await?;
    Ok(Json(ratings))
}

pub async fn teacher_detail(
    State(state): State<AppState>,
    AppPath(teacher_name): AppPath<String>,
) -> Result<Json<TeacherDetail>, AppError> {
    let detail = RatingService::new(state.db.clone())
        .teacher_detail(&teacher_name)
        .await?;
    Ok(Json(detail))
}
