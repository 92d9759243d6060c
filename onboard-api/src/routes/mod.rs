/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login and current user
/// - `users`: Profile onboarding, checklist progress, admin listing
/// - `paths`: Onboarding path catalog

pub mod auth;
pub mod health;
pub mod paths;
pub mod users;

use crate::error::ApiError;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
