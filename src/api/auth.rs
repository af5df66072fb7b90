use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::api::accounts;
use crate::api::extract::AppJson;
use crate::auth::StudentUser;
use crate::error::AppError;
use crate::models::{AdminLoginRequest, RegisterStudentRequest, StudentLoginRequest};
use crate::services::{AdminSession, StudentSession};
use crate::state::AppState;

pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<AdminLoginRequest>,
) -> Result<Json<AdminSession>, AppError> {
    Ok(Json(accounts(&state).login_admin(req).await?))
}

pub async fn student_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let student = accounts(&state).register_student(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created successfully! Please login.",
            "student": student,
        })),
    ))
}

pub async fn student_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<StudentLoginRequest>,
) -> Result<Json<StudentSession>, AppError> {
    Ok(Json(accounts(&state).login_student(req).await?))
}

pub async fn student_me(StudentUser(student): StudentUser) -> Json<Value> {
    Json(json!({ "student": student }))
}
