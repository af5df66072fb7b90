use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::auth::{Role, TokenSigner, hash_password, verify_password};
use crate::db::{admins, new_id, students, timestamp};
use crate::error::{AppError, conflict_on_unique, is_unique_violation};
use crate::models::{
    Admin, AdminLoginRequest, AdminProfile, RegisterStudentRequest, Student, StudentBadge,
    StudentLoginRequest, UpdateStudentRequest,
};
use crate::services::validation::{
    ALL_FIELDS_REQUIRED, normalize_email, normalize_student_id, present, validate_email,
    validate_password,
};

pub const DUPLICATE_STUDENT: &str = "Student ID or Email already exists";

#[derive(Debug, Serialize)]
pub struct AdminSession {
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Debug, Serialize)]
pub struct StudentSession {
    pub token: String,
    pub student: Student,
}

fn student_not_found() -> AppError {
    AppError::NotFound("Student not found".to_string())
}

/// Student roster and credential handling for both roles.
pub struct AccountService {
    db: SqlitePool,
    tokens: TokenSigner,
    email_domain: String,
}

impl AccountService {
    pub fn new(db: SqlitePool, tokens: TokenSigner, email_domain: impl Into<String>) -> Self {
        Self {
            db,
            tokens,
            email_domain: email_domain.into(),
        }
    }

    pub async fn register_student(&self, req: RegisterStudentRequest) -> Result<Student, AppError> {
        let (Some(student_id), Some(name), Some(email), Some(password), Some(department)) = (
            present(req.student_id.as_deref()),
            present(req.name.as_deref()),
            present(req.email.as_deref()),
            req.password.filter(|p| !p.is_empty()),
            present(req.department.as_deref()),
        ) else {
            return Err(AppError::BadRequest(ALL_FIELDS_REQUIRED.to_string()));
        };
        validate_password(&password)?;
        let email = validate_email(&email, &self.email_domain)?;
        let student_id = normalize_student_id(&student_id);

        if students::find_student_by_student_id(&self.db, &student_id).await?.is_some() {
            return Err(AppError::Conflict("Student ID already registered".to_string()));
        }
        if students::find_student_by_email(&self.db, &email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let student = Student {
            id: new_id(),
            student_id,
            name,
            email,
            password_hash: hash_password(&password)?,
            department,
            is_active: true,
            created_at: timestamp(),
        };
        students::insert_student(&self.db, &student)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_STUDENT))?;

        info!("student {} registered", student.student_id);
        Ok(student)
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, AppError> {
        Ok(students::fetch_students(&self.db).await?)
    }

    pub async fn update_student(&self, id: &str, req: UpdateStudentRequest) -> Result<Student, AppError> {
        let mut student = students::find_student_by_id(&self.db, id)
            .await?
            .ok_or_else(student_not_found)?;

        if let Some(name) = present(req.name.as_deref()) {
            student.name = name;
        }
        if let Some(email) = present(req.email.as_deref()) {
            student.email = validate_email(&email, &self.email_domain)?;
        }
        if let Some(password) = req.password.filter(|p| !p.is_empty()) {
            validate_password(&password)?;
            student.password_hash = hash_password(&password)?;
        }
        if let Some(department) = present(req.department.as_deref()) {
            student.department = department;
        }
        if let Some(is_active) = req.is_active {
            student.is_active = is_active;
        }

        let updated = students::update_student(&self.db, &student)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_STUDENT))?;
        if !updated {
            return Err(student_not_found());
        }

        info!("student {} updated", student.student_id);
        Ok(student)
    }

    pub async fn delete_student(&self, id: &str) -> Result<(), AppError> {
        if students::delete_student(&self.db, id).await? {
            info!("student {} deleted", id);
            Ok(())
        } else {
            Err(student_not_found())
        }
    }

    /// Public lookup used by the feedback form before submission.
    pub async fn verify_student(&self, student_id: Option<&str>) -> Result<StudentBadge, AppError> {
        let student_id = present(student_id)
            .ok_or_else(|| AppError::BadRequest("Student ID is required".to_string()))?;

        match students::find_student_by_student_id(&self.db, &normalize_student_id(&student_id)).await? {
            Some(student) if student.is_active => Ok(StudentBadge::from(&student)),
            _ => Err(AppError::NotFound("Student ID not found or inactive".to_string())),
        }
    }

    pub async fn login_student(&self, req: StudentLoginRequest) -> Result<StudentSession, AppError> {
        let (Some(student_id), Some(password)) =
            (present(req.student_id.as_deref()), req.password.filter(|p| !p.is_empty()))
        else {
            return Err(AppError::BadRequest("Student ID and password are required".to_string()));
        };

        let student = students::find_student_by_student_id(&self.db, &normalize_student_id(&student_id))
            .await?
            .filter(|s| s.is_active && verify_password(&password, &s.password_hash))
            .ok_or_else(|| {
                debug!("student login failed for {}", student_id);
                AppError::Unauthorized
            })?;

        let token = self.issue(&student.id, Role::Student)?;
        info!("student {} logged in", student.student_id);
        Ok(StudentSession { token, student })
    }

    pub async fn login_admin(&self, req: AdminLoginRequest) -> Result<AdminSession, AppError> {
        let invalid = || AppError::BadRequest("Invalid credentials".to_string());
        let (Some(email), Some(password)) =
            (present(req.email.as_deref()), req.password.filter(|p| !p.is_empty()))
        else {
            return Err(invalid());
        };

        let admin = admins::find_admin_by_email(&self.db, &normalize_email(&email))
            .await?
            .filter(|a| verify_password(&password, &a.password_hash))
            .ok_or_else(invalid)?;

        let token = self.issue(&admin.id, Role::Admin)?;
        info!("admin {} logged in", admin.email);
        Ok(AdminSession {
            token,
            admin: AdminProfile::from(&admin),
        })
    }

    /// Creates an administrator account. Returns `None` when the email is
    /// already taken, including when another writer claims it between the
    /// lookup and the insert.
    pub async fn create_admin(&self, email: &str, password: &str) -> Result<Option<Admin>, AppError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::BadRequest("Email and password are required".to_string()));
        }
        if admins::find_admin_by_email(&self.db, &email).await?.is_some() {
            return Ok(None);
        }

        let admin = Admin {
            id: new_id(),
            email,
            password_hash: hash_password(password)?,
            created_at: timestamp(),
        };
        match admins::insert_admin(&self.db, &admin).await {
            Ok(()) => {}
            Err(e) if is_unique_violation(&e) => {
                debug!("admin {} created concurrently", admin.email);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }
        info!("admin {} created", admin.email);
        Ok(Some(admin))
    }

    fn issue(&self, subject: &str, role: Role) -> Result<String, AppError> {
        self.tokens.issue(subject, role).map_err(|e| {
            tracing::error!("token issuance failed: {}", e);
            AppError::InternalServerError
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EMAIL_DOMAIN;
    use crate::db::connect_in_memory;

    async fn service() -> AccountService {
        let pool = connect_in_memory().await.expect("Failed to create test db");
        AccountService::new(pool, TokenSigner::new("test-secret"), DEFAULT_EMAIL_DOMAIN)
    }

    fn registration(student_id: &str, email: &str) -> RegisterStudentRequest {
        RegisterStudentRequest {
            student_id: Some(student_id.to_string()),
            name: Some("Bilal".to_string()),
            email: Some(email.to_string()),
            password: Some("secret1".to_string()),
            department: Some("Computer Science".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_and_hashes() {
        let accounts = service().await;
        let student = accounts
            .register_student(registration("cs-2021-010", "Bilal@KarachiUniversity.edu"))
            .await
            .unwrap();

        assert_eq!(student.student_id, "CS-2021-010");
        assert_eq!(student.email, "bilal@karachiuniversity.edu");
        assert_ne!(student.password_hash, "secret1");
        let json = serde_json::to_value(&student).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["studentId"], "CS-2021-010");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let accounts = service().await;
        accounts
            .register_student(registration("CS-1", "one@karachiuniversity.edu"))
            .await
            .unwrap();

        let err = accounts
            .register_student(registration("cs-1", "two@karachiuniversity.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Student ID already registered"));

        let err = accounts
            .register_student(registration("CS-2", "ONE@karachiuniversity.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already registered"));

        let err = accounts
            .register_student(registration("CS-3", "three@gmail.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let mut short = registration("CS-4", "four@karachiuniversity.edu");
        short.password = Some("12345".to_string());
        assert!(accounts.register_student(short).await.is_err());
    }

    #[tokio::test]
    async fn test_student_login_and_deactivation() {
        let accounts = service().await;
        let student = accounts
            .register_student(registration("CS-5", "five@karachiuniversity.edu"))
            .await
            .unwrap();

        let session = accounts
            .login_student(StudentLoginRequest {
                student_id: Some("cs-5".to_string()),
                password: Some("secret1".to_string()),
            })
            .await
            .unwrap();
        let claims = accounts.tokens.verify(&session.token).unwrap();
        assert_eq!(claims.sub, student.id);
        assert_eq!(claims.role, Role::Student);

        let wrong = accounts
            .login_student(StudentLoginRequest {
                student_id: Some("CS-5".to_string()),
                password: Some("wrong-password".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized));

        accounts
            .update_student(
                &student.id,
                UpdateStudentRequest { is_active: Some(false), ..Default::default() },
            )
            .await
            .unwrap();
        let inactive = accounts
            .login_student(StudentLoginRequest {
                student_id: Some("CS-5".to_string()),
                password: Some("secret1".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(inactive, AppError::Unauthorized));
        assert!(matches!(
            accounts.verify_student(Some("CS-5")).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_admin_creation_and_login() {
        let accounts = service().await;
        let admin = accounts
            .create_admin("Admin@S.com", "admin-pass")
            .await
            .unwrap()
            .expect("admin created");
        assert!(accounts.create_admin("admin@s.com", "x").await.unwrap().is_none());

        let session = accounts
            .login_admin(AdminLoginRequest {
                email: Some("admin@s.com".to_string()),
                password: Some("admin-pass".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(session.admin.id, admin.id);
        assert_eq!(accounts.tokens.verify(&session.token).unwrap().role, Role::Admin);

        let err = accounts
            .login_admin(AdminLoginRequest {
                email: Some("admin@s.com".to_string()),
                password: Some("nope".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_admin_email_claimed_mid_creation_is_reported_as_existing() {
        let accounts = service().await;

        sqlx::query(
            r#"
            CREATE TRIGGER concurrent_admin BEFORE INSERT ON admins
            WHEN NOT EXISTS (SELECT 1 FROM admins WHERE email = NEW.email)
            BEGIN
                INSERT INTO admins (id, email, password_hash, created_at)
                VALUES (NEW.id || '-other', NEW.email, 'other', NEW.created_at);
            END
            "#,
        )
        .execute(&accounts.db)
        .await
        .unwrap();

        let created = accounts.create_admin("admin@s.com", "admin-pass").await.unwrap();
        assert!(created.is_none());
    }
}
