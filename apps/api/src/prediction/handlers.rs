use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::funnel::handlers::with_session;
use crate::prediction::service::{predict_career, PredictionOutcome};
use crate::prediction::Prediction;
use crate::scores::SubjectScores;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PredictRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub scores: SubjectScores,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// POST /api/v1/predict
pub async fn handle_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictionOutcome>, AppError> {
    let outcome = predict_career(
        state.store.as_ref(),
        state.advisor.as_ref(),
        req.user_id,
        &req.scores,
    )
    .await?;

    let prediction = outcome.prediction.clone();
    let scores = req.scores;
    with_session(&state, req.session_id, move |s| {
        s.record_scores(scores);
        s.record_prediction(prediction);
    })
    .await;

    Ok(Json(outcome))
}

/// GET /api/v1/predict/latest
pub async fn handle_latest_prediction(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Option<Prediction>>, AppError> {
    let latest = state.store.latest_recommendation(params.user_id).await?;
    Ok(Json(latest.map(Prediction::from)))
}
