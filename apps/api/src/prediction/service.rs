use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend_client::{BackendError, CareerAdvisor};
use crate::defaults::{with_defaults, CAREER_DETAIL_DEFAULTS};
use crate::errors::AppError;
use crate::prediction::Prediction;
use crate::scores::SubjectScores;
use crate::store::{NewRecommendation, PreferencesPatch, ProfileStore};

pub const PREDICTION_FAILED: &str = "Failed to get career prediction";
pub const DETAILS_FAILED_NOTICE: &str = "Failed to get career details";
pub const SAVE_FAILED_NOTICE: &str = "Failed to save career prediction";

#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    #[serde(flatten)]
    pub prediction: Prediction,
    /// The recommendation row was written.
    pub saved: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

/// Validates, predicts, enriches, persists. Only validation and the
/// prediction call itself can fail the request; enrichment and persistence
/// problems are reported as notices.
pub async fn predict_career(
    store: &dyn ProfileStore,
    advisor: &dyn CareerAdvisor,
    user_id: Uuid,
    scores: &SubjectScores,
) -> Result<PredictionOutcome, AppError> {
    scores.validate()?;

    let response = advisor.predict(scores).await.map_err(upstream)?;
    let career = response
        .career
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| upstream(BackendError::MissingField("career")))?;
    info!("Predicted career for {user_id}: {career}");

    let mut notices = Vec::new();
    let details = match advisor.career_details(&career).await {
        Ok(details) => Some(with_defaults(details, CAREER_DETAIL_DEFAULTS)),
        Err(e) => {
            warn!("Career details for {career} unavailable: {e}");
            notices.push(DETAILS_FAILED_NOTICE.to_string());
            None
        }
    };

    let prediction = Prediction {
        career,
        confidence_score: response.confidence_score,
        details,
    };

    let saved = match persist(store, user_id, &prediction).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Persisting prediction for {user_id} failed: {e}");
            notices.push(SAVE_FAILED_NOTICE.to_string());
            false
        }
    };

    Ok(PredictionOutcome {
        prediction,
        saved,
        notices,
    })
}

fn upstream(err: BackendError) -> AppError {
    warn!("Prediction request failed: {err}");
    AppError::Upstream(PREDICTION_FAILED.to_string())
}

async fn persist(
    store: &dyn ProfileStore,
    user_id: Uuid,
    prediction: &Prediction,
) -> Result<(), AppError> {
    store
        .insert_recommendation(NewRecommendation {
            user_id,
            career: &prediction.career,
            confidence_score: prediction.confidence_score,
            career_details: prediction.details.as_ref(),
        })
        .await?;

    store
        .upsert_user_preferences(user_id, preferences_from(prediction))
        .await?;
    Ok(())
}

/// Career field, salary and work-life balance as the preferences row keeps them.
fn preferences_from(prediction: &Prediction) -> PreferencesPatch {
    let details = prediction.details.as_ref();
    PreferencesPatch {
        preferred_career_fields: Some(vec![prediction.career.clone()]),
        salary_expectations: details
            .and_then(|d| d.get("salary_range"))
            .and_then(scalar_text),
        work_life_balance_preference: details
            .and_then(|d| d.pointer("/work_life_balance/rating"))
            .and_then(scalar_text),
        preferred_universities: None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
