use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::funnel::handlers::with_session;
use crate::recommendations::universities::MISSING_PREDICTION;
use crate::roadmap::service::{complete_step, load_or_generate};
use crate::roadmap::RoadmapView;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RoadmapQuery {
    pub user_id: Uuid,
    pub career: Option<String>,
    pub session_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct CompleteStepRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub career: Option<String>,
}

/// Explicit career, else the latest stored prediction.
async fn resolve_career(
    state: &AppState,
    user_id: Uuid,
    career: Option<String>,
) -> Result<String, AppError> {
    if let Some(career) = career.filter(|c| !c.trim().is_empty()) {
        return Ok(career);
    }
    state
        .store
        .latest_recommendation(user_id)
        .await?
        .map(|row| row.recommended_career)
        .ok_or_else(|| AppError::Validation(MISSING_PREDICTION.to_string()))
}

/// GET /api/v1/roadmap
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    Query(params): Query<RoadmapQuery>,
) -> Result<Json<RoadmapView>, AppError> {
    let session = match params.session_id {
        Some(id) => state.sessions.get(id).await,
        None => None,
    };
    let requested = params.career.clone().filter(|c| !c.trim().is_empty());
    let session_career = session
        .as_ref()
        .and_then(|s| s.prediction.as_ref())
        .map(|p| p.career.clone());
    let career = match requested.or(session_career) {
        Some(career) => career,
        None => resolve_career(&state, params.user_id, None).await?,
    };

    let scores = match session.as_ref().and_then(|s| s.scores) {
        Some(scores) => Some(scores),
        None => state
            .store
            .latest_scores(params.user_id)
            .await?
            .map(|row| row.scores()),
    };

    let view = load_or_generate(
        state.store.as_ref(),
        state.advisor.as_ref(),
        params.user_id,
        &career,
        scores.as_ref(),
    )
    .await?;

    let cached = view.clone();
    with_session(&state, params.session_id, move |s| {
        s.attach_roadmap(cached);
    })
    .await;

    Ok(Json(view))
}

/// POST /api/v1/roadmap/steps/:index/complete
pub async fn handle_complete_step(
    State(state): State<AppState>,
    Path(index): Path<i32>,
    Json(req): Json<CompleteStepRequest>,
) -> Result<Json<RoadmapView>, AppError> {
    let career = resolve_career(&state, req.user_id, req.career).await?;
    let view = complete_step(state.store.as_ref(), req.user_id, &career, index).await?;
    Ok(Json(view))
}
