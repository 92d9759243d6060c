/// User endpoints
///
/// All routes here sit behind the bearer token layer.
///
/// # Endpoints
///
/// - `PUT /api/users/profile` - Submit profile answers, get an onboarding path
/// - `GET /api/users/profile` - Profile with the assigned path, if any
/// - `GET /api/users` - Every user with the name of their path (admin view)
/// - `GET /api/users/checklist` - Assigned checklist with completion state
/// - `PUT /api/users/checklist/:index` - Mark one checklist item (un)completed

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    Extension,
};
use onboard_shared::{
    auth::middleware::AuthContext,
    models::{
        checklist_progress::{merge_progress, ChecklistEntry, ChecklistProgress},
        onboarding_path::{OnboardingPath, PathDetails},
        user::{PublicUser, UpdateProfile, User, UserListing},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile form answers
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,

    #[validate(length(min = 1, message = "Team size is required"))]
    pub team_size: String,

    #[validate(length(min = 1, message = "Goal is required"))]
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdateResponse {
    pub user: PublicUser,

    /// Label of the assigned path
    #[serde(rename = "assignedPath")]
    pub assigned_path: String,

    #[serde(rename = "welcomeMessage")]
    pub welcome_message: String,

    pub path: PathDetails,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
    pub path: Option<PathDetails>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserListing>,
    pub total: usize,
}

/// Checklist item toggle
#[derive(Debug, Deserialize, Validate)]
pub struct ChecklistUpdateRequest {
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ChecklistSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ChecklistResponse {
    pub path: ChecklistSummary,
    pub items: Vec<ChecklistEntry>,

    /// Number of completed items
    pub completed: usize,

    pub total: usize,
}

async fn current_user(state: &AppState, auth: &AuthContext) -> ApiResult<User> {
    User::find_by_id(&state.db, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Submit the onboarding profile
///
/// Classifies the answers into a path label, stores the answers with the
/// resolved path and returns a welcome message.
///
/// ```text
/// PUT /api/users/profile
/// Authorization: Bearer <token>
///
/// { "role": "Founder", "team_size": "6-20 people", "goal": "Grow revenue" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: A field is missing or empty
/// - `500 Internal Server Error`: The classified label has no stored path, or
///   the token's user no longer exists
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<ProfileRequest>,
) -> ApiResult<ApiResponse<ProfileUpdateResponse>> {
    let label = state
        .classifier
        .classify(&req.role, &req.team_size, &req.goal)
        .await;

    let path = OnboardingPath::find_by_user_type(&state.db, &label)
        .await?
        .ok_or_else(|| ApiError::InternalError(format!("No stored path for label {}", label)))?;

    let user = User::update_profile(
        &state.db,
        &auth.user_id,
        UpdateProfile {
            role: Some(req.role),
            team_size: Some(req.team_size),
            goal: Some(req.goal),
            assigned_path: Some(path.id.clone()),
        },
    )
    .await?
    .ok_or_else(|| ApiError::InternalError("Could not update user profile".to_string()))?;

    let welcome_message = state
        .classifier
        .compose_welcome(user.display_name(), &label)
        .await;

    tracing::info!(user_id = %user.id, path = %label, "Onboarding path assigned");

    Ok(ApiResponse::ok(ProfileUpdateResponse {
        user: user.into(),
        assigned_path: label,
        welcome_message,
        path: path.details(),
    }))
}

/// Profile with the assigned path (`null` before onboarding)
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<ProfileResponse>> {
    let user = current_user(&state, &auth).await?;

    let path = match user.assigned_path.as_deref() {
        Some(path_id) => OnboardingPath::find_by_id(&state.db, path_id)
            .await?
            .map(|path| path.details()),
        None => None,
    };

    Ok(ApiResponse::ok(ProfileResponse {
        user: user.into(),
        path,
    }))
}

/// All users, newest first
///
/// Any authenticated user may call this; there is no role model.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<ApiResponse<UserListResponse>> {
    let users = User::list_all(&state.db).await?;
    let total = users.len();

    Ok(ApiResponse::ok(UserListResponse { users, total }))
}

/// Checklist of the assigned path with completion state
///
/// # Errors
///
/// - `404 Not Found`: Unknown user, or no path assigned yet
pub async fn get_checklist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<ChecklistResponse>> {
    let user = current_user(&state, &auth).await?;
    let path = assigned_path(&state, &user).await?;

    Ok(ApiResponse::ok(checklist_response(&state, &user, &path).await?))
}

/// Marks one checklist item completed or not completed
///
/// ```text
/// PUT /api/users/checklist/2
/// Authorization: Bearer <token>
///
/// { "completed": true }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Index is not a number or is past the last item
/// - `404 Not Found`: Unknown user, or no path assigned yet
pub async fn update_checklist_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(index): Path<String>,
    ValidatedJson(req): ValidatedJson<ChecklistUpdateRequest>,
) -> ApiResult<ApiResponse<ChecklistResponse>> {
    let index: usize = index
        .parse()
        .map_err(|_| ApiError::BadRequest("Checklist index must be a non-negative integer".to_string()))?;

    let user = current_user(&state, &auth).await?;
    let path = assigned_path(&state, &user).await?;

    let item_count = path.parse_checklist().len();
    if index >= item_count {
        return Err(ApiError::BadRequest(format!(
            "Checklist item {} does not exist (path has {} items)",
            index, item_count
        )));
    }

    ChecklistProgress::set_completed(&state.db, &user.id, &path.id, index as i64, req.completed)
        .await?;

    tracing::debug!(user_id = %user.id, index, completed = req.completed, "Checklist item updated");

    Ok(ApiResponse::ok(checklist_response(&state, &user, &path).await?))
}

async fn assigned_path(state: &AppState, user: &User) -> ApiResult<OnboardingPath> {
    let path_id = user
        .assigned_path
        .as_deref()
        .ok_or_else(|| ApiError::NotFound("No onboarding path assigned yet".to_string()))?;

    OnboardingPath::find_by_id(&state.db, path_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assigned path not found".to_string()))
}

async fn checklist_response(
    state: &AppState,
    user: &User,
    path: &OnboardingPath,
) -> ApiResult<ChecklistResponse> {
    let progress = ChecklistProgress::list_for_path(&state.db, &user.id, &path.id).await?;
    let items = merge_progress(&path.parse_checklist(), &progress);
    let completed = items.iter().filter(|item| item.completed).count();

    Ok(ChecklistResponse {
        path: ChecklistSummary {
            id: path.id.clone(),
            name: path.name.clone(),
        },
        total: items.len(),
        completed,
        items,
    })
}
