/// Path catalog endpoint
///
/// `GET /api/paths` lists every onboarding path with its checklist, ordered
/// by label. Public, so the client can show the catalog before signup.

use crate::{app::AppState, error::ApiResult, response::ApiResponse};
use axum::extract::State;
use onboard_shared::models::onboarding_path::{OnboardingPath, PathDetails};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PathListResponse {
    pub paths: Vec<PathDetails>,
    pub total: usize,
}

pub async fn list_paths(State(state): State<AppState>) -> ApiResult<ApiResponse<PathListResponse>> {
    let paths: Vec<PathDetails> = OnboardingPath::list_all(&state.db)
        .await?
        .iter()
        .map(OnboardingPath::details)
        .collect();

    Ok(ApiResponse::ok(PathListResponse {
        total: paths.len(),
        paths,
    }))
}
