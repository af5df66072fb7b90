use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::api::accounts;
use crate::api::extract::{AppJson, AppPath};
use crate::auth::AdminUser;
use crate::error::AppError;
use crate::models::{RegisterStudentRequest, Student, UpdateStudentRequest, VerifyStudentRequest};
use crate::state::AppState;

pub async fn list_students(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(accounts(&state).list_students().await?))
}

pub async fn create_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(req): AppJson<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let student = accounts(&state).register_student(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Student added successfully", "student": student })),
    ))
}

pub async fn verify_student(
    State(state): State<AppState>,
    AppJson(req): AppJson<VerifyStudentRequest>,
) -> Result<Json<Value>, AppError> {
    let student = accounts(&state)
        .verify_student(req.student_id.as_deref())
        .await?;
    Ok(Json(json!({ "valid": true, "student": student })))
}

pub async fn update_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<UpdateStudentRequest>,
) -> Result<Json<Value>, AppError> {
    let student = accounts(&state).update_student(&id, req).await?;
    Ok(Json(json!({ "message": "Student updated successfully", "student": student })))
}

pub async fn delete_student(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<Value>, AppError> {
    accounts(&state).delete_student(&id).await?;
    Ok(Json(json!({ "message": "Student deleted successfully" })))
}
