pub mod accounts;
pub mod catalog;
pub mod feedback_service;
pub mod ratings;
pub mod validation;

pub use accounts::{AccountService, AdminSession, StudentSession};
pub use catalog::CatalogService;
pub use feedback_service::FeedbackService;
pub use ratings::RatingService;
