use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::funnel::{FunnelSession, SessionSnapshot, Step};
use crate::prediction::Prediction;
use crate::roadmap::service::load_or_generate;
use crate::scores::ScoreDraft;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub step: Step,
}

#[derive(Serialize)]
pub struct NavigateResponse {
    pub moved: bool,
    pub session: SessionSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// POST /api/v1/sessions
///
/// Resumes from the latest stored scores and prediction, loaded concurrently.
/// A failed load only means that part starts empty.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let (scores, recommendation) = tokio::join!(
        state.store.latest_scores(req.user_id),
        state.store.latest_recommendation(req.user_id),
    );

    let mut session = FunnelSession::new(req.user_id);
    match scores {
        Ok(Some(row)) => session.record_scores(row.scores()),
        Ok(None) => {}
        Err(e) => warn!("Could not resume scores for {}: {e}", req.user_id),
    }
    match recommendation {
        Ok(Some(row)) => {
            session.prediction = Some(Prediction::from(row));
        }
        Ok(None) => {}
        Err(e) => warn!("Could not resume prediction for {}: {e}", req.user_id),
    }

    let snapshot = session.snapshot();
    info!(
        "Opened session {} for user {}",
        session.session_id, req.user_id
    );
    state.sessions.insert(session).await;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/navigate
///
/// Entering the roadmap step without a cached roadmap fetches one first; if
/// that fails the move still happens and a notice is attached.
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    let mut notice = None;
    let mut roadmap = None;
    if req.step == Step::Roadmap && session.can_enter(Step::Roadmap) && session.roadmap.is_none()
    {
        if let Some(prediction) = &session.prediction {
            match load_or_generate(
                state.store.as_ref(),
                state.advisor.as_ref(),
                session.user_id,
                &prediction.career,
                session.scores.as_ref(),
            )
            .await
            {
                Ok(view) => roadmap = Some(view),
                Err(e) => {
                    warn!("Roadmap fetch on navigation failed: {e}");
                    notice = Some("Failed to load career roadmap".to_string());
                }
            }
        }
    }

    let result = state
        .sessions
        .update(id, |s| {
            if let Some(view) = roadmap {
                if !s.attach_roadmap(view) {
                    info!("Prediction for session {id} changed; dropping fetched roadmap");
                }
            }
            let moved = s.navigate(req.step);
            (moved, s.snapshot())
        })
        .await;
    let (moved, snapshot) = result.ok_or_else(|| session_not_found(id))?;

    Ok(Json(NavigateResponse {
        moved,
        session: snapshot,
        notice,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        info!("Closed session {id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// Applies `f` to the named session if it is still open. A missing id or a
/// session closed mid-request is silently skipped.
pub async fn with_session<F>(state: &AppState, session_id: Option<Uuid>, f: F)
where
    F: FnOnce(&mut FunnelSession),
{
    if let Some(id) = session_id {
        if state.sessions.update(id, f).await.is_none() {
            info!("Session {id} is closed; dropping result");
        }
    }
}

/// Score draft of an open session, if any.
pub async fn session_draft(state: &AppState, session_id: Option<Uuid>) -> Option<ScoreDraft> {
    let id = session_id?;
    state.sessions.get(id).await.map(|s| s.draft)
}
