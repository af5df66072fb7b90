use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::auth::AdminUser;
use crate::error::AppError;
use crate::models::{Course, CourseFilter, NewCourseRequest, UpdateCourseRequest};
use crate::services::CatalogService;
use crate::state::AppState;

pub async fn list_courses(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<CourseFilter>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CatalogService::new(state.db.clone()).list(&filter).await?;
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Course>, AppError> {
    let course = CatalogService::new(state.db.clone()).get(&id).await?;
    Ok(Json(course))
}

pub async fn create_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(req): AppJson<NewCourseRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let course = CatalogService::new(state.db.clone()).create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Course added successfully", "course": course })),
    ))
}

pub async fn update_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<UpdateCourseRequest>,
) -> Result<Json<Value>, AppError> {
    let course = CatalogService::new(state.db.clone()).update(&id, req).await?;
    Ok(Json(json!({ "message": "Course updated successfully", "course": course })))
}

pub async fn delete_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<Value>, AppError> {
    CatalogService::new(state.db.clone()).delete(&id).await?;
    Ok(Json(json!({ "message": "Course deleted successfully" })))
}
