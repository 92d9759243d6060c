/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Create an account and get a token
/// - `POST /api/auth/login` - Exchange credentials for a token
/// - `GET /api/auth/me` - Current user (bearer token required)

use crate::{
    app::AppState,
    error::{is_unique_violation, ApiError, ApiResult},
    extract::ValidatedJson,
    response::ApiResponse,
};
use axum::{extract::State, http::StatusCode, Extension};
use onboard_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, PublicUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Same message for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Signup and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,

    /// Bearer token for subsequent requests
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Register a new user
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// { "email": "a@x.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<(StatusCode, ApiResponse<AuthResponse>)> {
    let plain = req.password;
    let password_hash = run_blocking(move || Ok(password::hash_password(&plain)?)).await?;

    // The UNIQUE constraint on email decides concurrent signups
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Email already registered".to_string())
        } else {
            e.into()
        }
    })?;

    let token = jwt::issue_token(&user.id, &user.email, state.jwt_secret(), state.token_lifetime())?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok(ApiResponse::created(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Login with email and password
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let plain = req.password;
    let stored_hash = user.password_hash.clone();
    let matches = run_blocking(move || Ok(password::verify_password(&plain, &stored_hash)?)).await?;

    if !matches {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = jwt::issue_token(&user.id, &user.email, state.jwt_secret(), state.token_lifetime())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiResponse::ok(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Current user
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: The token's user no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<MeResponse>> {
    let user = User::find_by_id(&state.db, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(MeResponse { user: user.into() }))
}

/// Runs Argon2 work off the async worker threads
async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::InternalError(format!("Password task failed: {}", e)))?
}
