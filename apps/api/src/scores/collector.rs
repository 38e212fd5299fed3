//! Loading and auto-saving the score form against the profile store.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::scores::{ScoreDraft, SubjectScores};
use crate::store::ProfileStore;

pub const NO_SCORES_NOTICE: &str = "No academic scores found. Please enter your scores.";
pub const LOAD_FAILED_NOTICE: &str = "Failed to load academic scores";
pub const SAVE_FAILED_NOTICE: &str = "Failed to save academic scores";

/// The score form as shown on entry to step 1.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedScores {
    pub scores: ScoreDraft,
    pub gpa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl LoadedScores {
    fn zeros(notice: &str) -> Self {
        Self {
            scores: ScoreDraft::zeros(),
            gpa: 0.0,
            notice: Some(notice.to_string()),
        }
    }
}

/// Result of applying one change set to the form.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreUpdate {
    pub scores: ScoreDraft,
    pub gpa: Option<f64>,
    pub complete: bool,
    /// The complete set is what the store now holds as latest.
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Reads the latest record. Never fails: absence and store errors both fall
/// back to all zeros with a notice.
pub async fn load_scores(store: &dyn ProfileStore, user_id: Uuid) -> LoadedScores {
    match store.latest_scores(user_id).await {
        Ok(Some(row)) => {
            let scores = row.scores();
            LoadedScores {
                scores: ScoreDraft::from(scores),
                gpa: scores.gpa(),
                notice: None,
            }
        }
        Ok(None) => LoadedScores::zeros(NO_SCORES_NOTICE),
        Err(e) => {
            warn!("Loading scores for {user_id} failed: {e}");
            LoadedScores::zeros(LOAD_FAILED_NOTICE)
        }
    }
}

/// Appends `scores` unless the latest stored record already equals them.
/// Returns whether a row was written.
pub async fn save_scores(
    store: &dyn ProfileStore,
    user_id: Uuid,
    scores: &SubjectScores,
) -> Result<bool, AppError> {
    scores.validate()?;

    if let Some(latest) = store.latest_scores(user_id).await? {
        if latest.scores() == *scores {
            debug!("Scores for {user_id} unchanged; skipping insert");
            return Ok(false);
        }
    }

    store.insert_scores(user_id, scores, scores.gpa()).await?;
    info!("Saved academic scores for {user_id}");
    Ok(true)
}

/// Applies `changes` on top of `draft`. An out-of-range value rejects the
/// whole change set and leaves `draft` untouched. Once all seven fields are
/// set the record is saved; a failed save is reported, not raised.
pub async fn apply_change(
    store: &dyn ProfileStore,
    user_id: Uuid,
    draft: &mut ScoreDraft,
    changes: &ScoreDraft,
) -> Result<ScoreUpdate, AppError> {
    draft.apply(changes)?;

    let complete = draft.complete();
    let (saved, notice) = match complete {
        Some(scores) => match save_scores(store, user_id, &scores).await {
            Ok(_) => (true, None),
            Err(e) => {
                warn!("Auto-save for {user_id} failed: {e}");
                (false, Some(SAVE_FAILED_NOTICE.to_string()))
            }
        },
        None => (false, None),
    };

    Ok(ScoreUpdate {
        scores: *draft,
        gpa: draft.gpa(),
        complete: complete.is_some(),
        saved,
        notice,
    })
}
