use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend_client::types::{UniversityRecommendation, UniversitySummaryRequest};
use crate::errors::AppError;
use crate::funnel::handlers::with_session;
use crate::funnel::Step;
use crate::models::university::SavedUniversityRow;
use crate::recommendations::alternatives::{self, find_alternatives, AlternativesOutcome};
use crate::recommendations::summary::{summarize_university, SummaryReply};
use crate::recommendations::universities::{
    self, recommend_universities, saved_snapshot, UniversityFilter, UniversityOutcome,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct UniversitiesRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub career: Option<String>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(flatten)]
    pub filter: UniversityFilter,
}

#[derive(Deserialize)]
pub struct SaveUniversityRequest {
    pub user_id: Uuid,
    pub university_name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct AlternativesRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// POST /api/v1/universities
pub async fn handle_universities(
    State(state): State<AppState>,
    Json(req): Json<UniversitiesRequest>,
) -> Result<Json<UniversityOutcome>, AppError> {
    let session = match req.session_id {
        Some(id) => state.sessions.get(id).await,
        None => None,
    };
    let (career, gpa) = universities::resolve_inputs(
        state.store.as_ref(),
        req.user_id,
        req.career,
        req.gpa,
        session.as_ref(),
    )
    .await?;

    let outcome = recommend_universities(
        state.store.as_ref(),
        state.advisor.as_ref(),
        req.user_id,
        &career,
        gpa,
        &req.filter,
    )
    .await?;

    let cached = outcome.clone();
    with_session(&state, req.session_id, move |s| {
        s.universities = Some(cached);
        s.navigate(Step::Universities);
    })
    .await;

    Ok(Json(outcome))
}

/// GET /api/v1/universities/preferences
pub async fn handle_university_preferences(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Option<Vec<UniversityRecommendation>>>, AppError> {
    let row = state
        .store
        .latest_university_preferences(params.user_id)
        .await?;
    Ok(Json(row.map(saved_snapshot)))
}

/// GET /api/v1/universities/saved
pub async fn handle_list_saved(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<SavedUniversityRow>>, AppError> {
    Ok(Json(state.store.saved_universities(params.user_id).await?))
}

/// POST /api/v1/universities/saved
///
/// Without notes, records interest in the latest predicted career.
pub async fn handle_save_university(
    State(state): State<AppState>,
    Json(req): Json<SaveUniversityRequest>,
) -> Result<(StatusCode, Json<SavedUniversityRow>), AppError> {
    let name = req.university_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "University name is required".to_string(),
        ));
    }

    let notes = match req.notes {
        Some(notes) => notes,
        None => {
            let career = state
                .store
                .latest_recommendation(req.user_id)
                .await?
                .map(|row| row.recommended_career);
            format!(
                "Interested in {}",
                career.as_deref().unwrap_or("unknown career")
            )
        }
    };

    let row = state
        .store
        .insert_saved_university(req.user_id, name, Some(&notes))
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /api/v1/universities/summary
pub async fn handle_university_summary(
    State(state): State<AppState>,
    Json(req): Json<UniversitySummaryRequest>,
) -> Result<Json<SummaryReply>, AppError> {
    if req.university_name.trim().is_empty() {
        return Err(AppError::Validation(
            "University name is required".to_string(),
        ));
    }
    Ok(Json(
        summarize_university(state.advisor.as_ref(), &req).await,
    ))
}

/// POST /api/v1/alternatives
///
/// Reuses the similar careers from the session's university step when present.
pub async fn handle_alternatives(
    State(state): State<AppState>,
    Json(req): Json<AlternativesRequest>,
) -> Result<Json<AlternativesOutcome>, AppError> {
    let session = match req.session_id {
        Some(id) => state.sessions.get(id).await,
        None => None,
    };
    let (career, scores) =
        alternatives::resolve_inputs(state.store.as_ref(), req.user_id, session.as_ref()).await?;

    let known_similar = session
        .as_ref()
        .and_then(|s| s.universities.as_ref())
        .map(|u| u.similar_careers().to_vec());

    let outcome = find_alternatives(state.advisor.as_ref(), &career, &scores, known_similar).await?;

    let cached = outcome.clone();
    with_session(&state, req.session_id, move |s| {
        s.alternatives = Some(cached);
        s.navigate(Step::Alternatives);
    })
    .await;

    Ok(Json(outcome))
}
