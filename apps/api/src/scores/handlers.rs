use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::funnel::handlers::{session_draft, with_session};
use crate::scores::collector::{apply_change, load_scores, LoadedScores, ScoreUpdate};
use crate::scores::ScoreDraft;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ScoreChangeRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub changes: ScoreDraft,
}

/// GET /api/v1/scores
pub async fn handle_get_scores(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Json<LoadedScores> {
    Json(load_scores(state.store.as_ref(), params.user_id).await)
}

/// PUT /api/v1/scores
///
/// Applies the change set to the open session's draft, or to the latest
/// stored record when no session is given.
pub async fn handle_put_scores(
    State(state): State<AppState>,
    Json(req): Json<ScoreChangeRequest>,
) -> Result<Json<ScoreUpdate>, AppError> {
    let mut draft = match session_draft(&state, req.session_id).await {
        Some(draft) => draft,
        None => state
            .store
            .latest_scores(req.user_id)
            .await?
            .map(|row| ScoreDraft::from(row.scores()))
            .unwrap_or_default(),
    };

    let update = apply_change(state.store.as_ref(), req.user_id, &mut draft, &req.changes).await?;

    with_session(&state, req.session_id, |s| s.record_draft(draft)).await;
    Ok(Json(update))
}
