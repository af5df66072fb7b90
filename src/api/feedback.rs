use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::auth::AdminUser;
use crate::error::AppError;
use crate::models::{FeedbackFilter, FeedbackView, SubmitFeedbackRequest};
use crate::services::FeedbackService;
use crate::state::AppState;

pub async fn submit_feedback(
    State(state): State<AppState>,
    AppJson(req): AppJson<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let feedback = FeedbackService::new(state.db.clone()).submit(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback submitted", "feedback": feedback })),
    ))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    AppQuery(filter): AppQuery<FeedbackFilter>,
) -> Result<Json<Vec<FeedbackView>>, AppError> {
    let feedback = FeedbackService::new(state.db.clone()).list_all(&filter).await?;
    Ok(Json(feedback))
}

pub async fn list_student_feedback(
    State(state): State<AppState>,
    AppPath(student_id): AppPath<String>,
) -> Result<Json<Vec<FeedbackView>>, AppError> {
    let feedback = FeedbackService::new(state.db.clone())
        .list_for_student(&student_id)
        .await?;
    Ok(Json(feedback))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<Value>, AppError> {
    FeedbackService::new(state.db.clone()).delete(&id).await?;
    tracing::info!("admin {} deleted feedback {}", admin.email, id);
    Ok(Json(json!({ "message": "Feedback deleted successfully" })))
}
