use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend_client::types::UniversityRecommendation;
use crate::backend_client::CareerAdvisor;
use crate::errors::AppError;
use crate::funnel::FunnelSession;
use crate::models::university::UniversityPreferenceRow;
use crate::store::{PreferencesPatch, ProfileStore};

pub const FETCH_FAILED: &str = "Failed to get university recommendations";
pub const NO_MATCHES: &str = "No universities found matching your criteria";
pub const MISSING_SCORES: &str = "Please complete your academic scores first";
pub const MISSING_PREDICTION: &str = "Please get a career prediction first";

/// An empty recommendation list is a result in its own right, distinct from a
/// failed fetch (which is an error).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UniversityOutcome {
    Matches {
        universities: Vec<UniversityRecommendation>,
        similar_careers: Vec<String>,
    },
    NoMatches {
        message: String,
        similar_careers: Vec<String>,
    },
}

impl UniversityOutcome {
    fn from_list(universities: Vec<UniversityRecommendation>, similar_careers: Vec<String>) -> Self {
        if universities.is_empty() {
            UniversityOutcome::NoMatches {
                message: NO_MATCHES.to_string(),
                similar_careers,
            }
        } else {
            UniversityOutcome::Matches {
                universities,
                similar_careers,
            }
        }
    }

    pub fn similar_careers(&self) -> &[String] {
        match self {
            UniversityOutcome::Matches {
                similar_careers, ..
            }
            | UniversityOutcome::NoMatches {
                similar_careers, ..
            } => similar_careers,
        }
    }
}

/// Client-side narrowing applied after the fetch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniversityFilter {
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Entries without a tuition figure pass.
    pub max_tuition: Option<f64>,
    /// Case-insensitive substring of the location. Entries without a
    /// location fail once this is set.
    pub location: Option<String>,
}

impl UniversityFilter {
    pub fn matches(&self, uni: &UniversityRecommendation) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or(true, |s| contains_ci(&uni.name, s));

        let tuition_ok = match (self.max_tuition, uni.tuition) {
            (Some(max), Some(tuition)) => tuition <= max,
            _ => true,
        };

        let location_ok = match self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(wanted) => uni
                .location
                .as_deref()
                .map_or(false, |loc| contains_ci(loc, wanted)),
            None => true,
        };

        search_ok && tuition_ok && location_ok
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Picks career and GPA from the request, then the open session, then the
/// store. GPA is checked first, matching the order of the funnel.
pub async fn resolve_inputs(
    store: &dyn ProfileStore,
    user_id: Uuid,
    career: Option<String>,
    gpa: Option<f64>,
    session: Option<&FunnelSession>,
) -> Result<(String, f64), AppError> {
    let gpa = match gpa.or_else(|| session.and_then(|s| s.scores.map(|sc| sc.gpa()))) {
        Some(gpa) => gpa,
        None => store
            .latest_scores(user_id)
            .await?
            .map(|row| row.gpa)
            .ok_or_else(|| AppError::Validation(MISSING_SCORES.to_string()))?,
    };

    let from_session = session.and_then(|s| s.prediction.as_ref().map(|p| p.career.clone()));
    let career = match career.filter(|c| !c.trim().is_empty()).or(from_session) {
        Some(career) => career,
        None => store
            .latest_recommendation(user_id)
            .await?
            .map(|row| row.recommended_career)
            .ok_or_else(|| AppError::Validation(MISSING_PREDICTION.to_string()))?,
    };

    Ok((career, gpa))
}

pub async fn recommend_universities(
    store: &dyn ProfileStore,
    advisor: &dyn CareerAdvisor,
    user_id: Uuid,
    career: &str,
    gpa: f64,
    filter: &UniversityFilter,
) -> Result<UniversityOutcome, AppError> {
    let response = advisor.recommend(career, gpa).await.map_err(|e| {
        warn!("University recommendation for {career} failed: {e}");
        AppError::Upstream(FETCH_FAILED.to_string())
    })?;

    let names: Vec<String> = response
        .recommended_universities
        .iter()
        .map(|u| u.name.clone())
        .collect();
    info!(
        "Got {} universities and {} similar careers for {career}",
        names.len(),
        response.similar_careers.len()
    );
    if !names.is_empty() {
        remember_names(store, user_id, names).await;
    }

    let universities = response
        .recommended_universities
        .into_iter()
        .filter(|u| filter.matches(u))
        .collect();
    Ok(UniversityOutcome::from_list(
        universities,
        response.similar_careers,
    ))
}

/// Snapshot of the latest names, for the "saved recommendations" view and the
/// preferences row. Failures are logged only.
async fn remember_names(store: &dyn ProfileStore, user_id: Uuid, names: Vec<String>) {
    if let Err(e) = store.upsert_university_preferences(user_id, &names).await {
        warn!("Saving university snapshot for {user_id} failed: {e}");
    }
    let patch = PreferencesPatch {
        preferred_universities: Some(names),
        ..PreferencesPatch::default()
    };
    if let Err(e) = store.upsert_user_preferences(user_id, patch).await {
        warn!("Saving preferred universities for {user_id} failed: {e}");
    }
}

/// A stored snapshot rendered as recommendations.
pub fn saved_snapshot(row: UniversityPreferenceRow) -> Vec<UniversityRecommendation> {
    row.preferred_universities
        .into_iter()
        .map(|name| UniversityRecommendation {
            name,
            tier: "Saved Recommendation".to_string(),
            description: Some("Previously recommended university".to_string()),
            admission_rate: None,
            tuition: None,
            location: None,
            relevant_majors: None,
            website: None,
        })
        .collect()
}
