use axum::{extract::State, Json};
use uuid::Uuid;

use crate::backend_client::types::ChatRequest;
use crate::chat::{respond, ChatReply};
use crate::errors::AppError;
use crate::funnel::session::FunnelSession;
use crate::state::AppState;

/// POST /api/v1/chat
///
/// When `session_id` names a live funnel session, missing career, GPA and
/// grades are taken from it. The id itself is forwarded unchanged.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(mut request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    let session_key = request
        .session_id
        .as_deref()
        .and_then(|id| Uuid::parse_str(id).ok());
    if let Some(id) = session_key {
        if let Some(session) = state.sessions.get(id).await {
            fill_context(&mut request, &session);
        }
    }

    Ok(Json(respond(state.advisor.as_ref(), &request).await))
}

fn fill_context(request: &mut ChatRequest, session: &FunnelSession) {
    if request.career.is_none() {
        request.career = session.prediction.as_ref().map(|p| p.career.clone());
    }
    if request.gpa.is_none() {
        request.gpa = session.draft.gpa();
    }
    if request.subject_grades.is_none() {
        let grades: std::collections::BTreeMap<_, _> = crate::scores::Subject::ALL
            .iter()
            .filter_map(|&s| session.draft.get(s).map(|v| (s.field().to_string(), f64::from(v))))
            .collect();
        if !grades.is_empty() {
            request.subject_grades = Some(grades);
        }
    }
}
