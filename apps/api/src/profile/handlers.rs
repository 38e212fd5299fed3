use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activities::ActivitiesProfile;
use crate::profile::progress::{build_report, load_inputs, ProgressReport};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ActivitiesRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub profile: ActivitiesProfile,
}

/// GET /api/v1/activities
///
/// A user with no saved form gets every field empty.
pub async fn handle_get_activities(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ActivitiesProfile>, AppError> {
    let row = state.store.activities(params.user_id).await?;
    Ok(Json(row.map(|r| r.profile).unwrap_or_default()))
}

/// PUT /api/v1/activities
pub async fn handle_put_activities(
    State(state): State<AppState>,
    Json(req): Json<ActivitiesRequest>,
) -> Result<Json<ActivitiesProfile>, AppError> {
    let row = state
        .store
        .upsert_activities(req.user_id, &req.profile)
        .await?;
    Ok(Json(row.profile))
}

/// GET /api/v1/progress
pub async fn handle_progress(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProgressReport>, AppError> {
    let inputs = load_inputs(state.store.as_ref(), params.user_id).await?;
    Ok(Json(build_report(inputs)))
}
