use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::auth::token::Role;
use crate::db::{admins, students};
use crate::error::AppError;
use crate::models::{Admin, Student};
use crate::state::AppState;

/// An authenticated administrator. Rejects with 401 when the bearer token is
/// missing, malformed, forged, expired, issued for another role, or names an
/// admin that no longer exists.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Admin);

/// An authenticated, active student.
#[derive(Debug, Clone)]
pub struct StudentUser(pub Student);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn subject_for(parts: &Parts, state: &AppState, role: Role) -> Result<String, AppError> {
    let token = bearer_token(parts).ok_or_else(|| {
        debug!("rejected request: missing bearer token");
        AppError::Unauthorized
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!("rejected request: {}", e);
        AppError::Unauthorized
    })?;

    if claims.role != role {
        debug!("rejected request: token role {:?}, need {:?}", claims.role, role);
        return Err(AppError::Unauthorized);
    }

    Ok(claims.sub)
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = subject_for(parts, state, Role::Admin)?;

        match admins::find_admin_by_id(&state.db, &id).await? {
            Some(admin) => Ok(AdminUser(admin)),
            None => {
                debug!("rejected request: admin {} not found", id);
                Err(AppError::Unauthorized)
            }
        }
    }
}

impl FromRequestParts<AppState> for StudentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = subject_for(parts, state, Role::Student)?;

        match students::find_student_by_id(&state.db, &id).await? {
            Some(student) if student.is_active => Ok(StudentUser(student)),
            _ => {
                debug!("rejected request: student {} not found or inactive", id);
                Err(AppError::Unauthorized)
            }
        }
    }
}
