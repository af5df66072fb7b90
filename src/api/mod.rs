pub mod auth;
pub mod courses;
pub mod extract;
pub mod feedback;
pub mod ratings;
pub mod students;

use axum::http::{Method, Uri, header};
use axum::routing::{delete, get, post, put};
use axum::{Router, extract::State, http::StatusCode};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::services::AccountService;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/auth/admin/login", post(auth::admin_login))
        .route("/auth/student/register", post(auth::student_register))
        .route("/auth/student/login", post(auth::student_login))
        .route("/auth/student/me", get(auth::student_me))
        .route("/feedback", get(feedback::list_feedback).post(feedback::submit_feedback))
        .route("/feedback/student/{student_id}", get(feedback::list_student_feedback))
        .route("/feedback/{id}", delete(feedback::delete_feedback))
        .route("/teacher-ratings", get(ratings::teacher_ratings))
        .route("/teacher-ratings/{teacher_name}", get(ratings::teacher_detail))
        .route("/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/students", get(students::list_students).post(students::create_student))
        .route("/students/verify", post(students::verify_student))
        .route(
            "/students/{id}",
            put(students::update_student).delete(students::delete_student),
        )
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) fn accounts(state: &AppState) -> AccountService {
    AccountService::new(
        state.db.clone(),
        state.tokens.clone(),
        state.config.allowed_email_domain.clone(),
    )
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Invalid path: {}", uri.path()))
}
