use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend_client::types::{AcademicProfile, AlternativeCareer, AnalyzeCareersRequest};
use crate::backend_client::CareerAdvisor;
use crate::errors::AppError;
use crate::funnel::FunnelSession;
use crate::recommendations::universities::{MISSING_PREDICTION, MISSING_SCORES};
use crate::scores::SubjectScores;
use crate::store::ProfileStore;

pub const FETCH_FAILED: &str = "Failed to get alternative careers";
pub const ANALYSIS_FAILED_NOTICE: &str = "Failed to analyze careers";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativesOutcome {
    pub predicted_career: String,
    pub careers: Vec<AlternativeCareer>,
    /// False when the analysis phase failed and only names are shown.
    pub analysis_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Predicted career and full scores, from the open session or the store.
pub async fn resolve_inputs(
    store: &dyn ProfileStore,
    user_id: Uuid,
    session: Option<&FunnelSession>,
) -> Result<(String, SubjectScores), AppError> {
    let scores = match session.and_then(|s| s.scores) {
        Some(scores) => scores,
        None => store
            .latest_scores(user_id)
            .await?
            .map(|row| row.scores())
            .ok_or_else(|| AppError::Validation(MISSING_SCORES.to_string()))?,
    };

    let career = match session.and_then(|s| s.prediction.as_ref()) {
        Some(prediction) => prediction.career.clone(),
        None => store
            .latest_recommendation(user_id)
            .await?
            .map(|row| row.recommended_career)
            .ok_or_else(|| AppError::Validation(MISSING_PREDICTION.to_string()))?,
    };

    Ok((career, scores))
}

/// Two phases: similar career names, then their analysis against the scores.
///
/// `known_similar` short-circuits phase 1 when the university step already
/// returned the list. A failed phase 1 fails the request; a failed phase 2
/// keeps the bare names.
pub async fn find_alternatives(
    advisor: &dyn CareerAdvisor,
    career: &str,
    scores: &SubjectScores,
    known_similar: Option<Vec<String>>,
) -> Result<AlternativesOutcome, AppError> {
    let profile = AcademicProfile::from(scores);

    let similar = match known_similar {
        Some(list) => list,
        None => {
            advisor
                .recommend(career, profile.gpa)
                .await
                .map_err(|e| {
                    warn!("Similar careers for {career} unavailable: {e}");
                    AppError::Upstream(FETCH_FAILED.to_string())
                })?
                .similar_careers
        }
    };

    if similar.is_empty() {
        return Ok(AlternativesOutcome {
            predicted_career: career.to_string(),
            careers: Vec::new(),
            analysis_available: false,
            notice: None,
        });
    }

    let request = AnalyzeCareersRequest {
        careers: &similar,
        academic_scores: &profile,
        predicted_career: career,
    };
    let outcome = match advisor.analyze_careers(&request).await {
        Ok(analyzed) if !analyzed.is_empty() => {
            info!("Analyzed {} alternatives to {career}", analyzed.len());
            AlternativesOutcome {
                predicted_career: career.to_string(),
                careers: merge_analysis(similar, analyzed),
                analysis_available: true,
                notice: None,
            }
        }
        result => {
            match result {
                Err(e) => warn!("Career analysis failed, keeping bare list: {e}"),
                Ok(_) => warn!("Career analysis returned nothing, keeping bare list"),
            }
            AlternativesOutcome {
                predicted_career: career.to_string(),
                careers: similar.into_iter().map(AlternativeCareer::bare).collect(),
                analysis_available: false,
                notice: Some(ANALYSIS_FAILED_NOTICE.to_string()),
            }
        }
    };
    Ok(outcome)
}

/// Every phase-1 name appears once, in phase-1 order: analysed where the
/// backend covered it, bare otherwise. Extra analysed careers follow.
fn merge_analysis(
    similar: Vec<String>,
    mut analyzed: Vec<AlternativeCareer>,
) -> Vec<AlternativeCareer> {
    let mut merged: Vec<AlternativeCareer> = similar
        .into_iter()
        .map(|name| {
            match analyzed
                .iter()
                .position(|a| a.career.eq_ignore_ascii_case(&name))
            {
                Some(index) => analyzed.remove(index),
                None => AlternativeCareer::bare(name),
            }
        })
        .collect();
    merged.extend(analyzed);
    merged
}
