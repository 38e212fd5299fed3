use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend_client::types::AcademicProfile;
use crate::backend_client::CareerAdvisor;
use crate::defaults::{fill_defaults, ROADMAP_DEFAULTS};
use crate::errors::AppError;
use crate::models::career::CareerRoadmapRow;
use crate::roadmap::{mark_complete, milestone_count, next_step, RoadmapView};
use crate::scores::SubjectScores;
use crate::store::ProfileStore;

pub const FETCH_FAILED: &str = "Failed to get career roadmap";

/// Returns the stored roadmap for `career`, generating and storing one when
/// none exists or the stored copy predates the latest prediction of the same
/// career.
pub async fn load_or_generate(
    store: &dyn ProfileStore,
    advisor: &dyn CareerAdvisor,
    user_id: Uuid,
    career: &str,
    scores: Option<&SubjectScores>,
) -> Result<RoadmapView, AppError> {
    if let Some(row) = store.latest_roadmap(user_id, career).await? {
        if !is_stale(store, user_id, &row).await? {
            return Ok(row.into());
        }
        info!("Roadmap for {career} predates the latest prediction; regenerating");
    }

    let profile = scores.map(AcademicProfile::from);
    let mut roadmap = advisor
        .career_roadmap(career, profile.as_ref())
        .await
        .map_err(|e| {
            warn!("Roadmap generation for {career} failed: {e}");
            AppError::Upstream(FETCH_FAILED.to_string())
        })?;
    let filled = fill_defaults(&mut roadmap, ROADMAP_DEFAULTS);
    if filled > 0 {
        info!("Filled {filled} empty roadmap sections for {career}");
    }

    let row = store
        .insert_roadmap(user_id, career, &Value::Object(roadmap))
        .await?;
    Ok(row.into())
}

async fn is_stale(
    store: &dyn ProfileStore,
    user_id: Uuid,
    row: &CareerRoadmapRow,
) -> Result<bool, AppError> {
    let latest = store.latest_recommendation(user_id).await?;
    Ok(latest.map_or(false, |rec| {
        rec.recommended_career == row.career && rec.recommended_at > row.created_at
    }))
}

/// Marks milestone `index` of the stored roadmap complete. Completing an
/// already completed milestone changes nothing.
pub async fn complete_step(
    store: &dyn ProfileStore,
    user_id: Uuid,
    career: &str,
    index: i32,
) -> Result<RoadmapView, AppError> {
    let row = store
        .latest_roadmap(user_id, career)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No roadmap found for {career}")))?;

    let count = milestone_count(&row.roadmap_steps);
    if index < 0 || index as usize >= count {
        return Err(AppError::Validation(format!(
            "Invalid step index {index}. Roadmap has {count} milestones."
        )));
    }

    let Some(completed) = mark_complete(&row.completed_steps, index) else {
        return Ok(row.into());
    };
    let current = next_step(&completed);

    let updated = store
        .update_roadmap_progress(row.id, &completed, current)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Roadmap {} not found", row.id)))?;
    info!("Milestone {index} of {career} complete for {user_id}");
    Ok(updated.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewRecommendation};
    use crate::testing::StubAdvisor;

    #[tokio::test]
    async fn test_first_load_generates_with_defaults_then_reuses() {
        let store = MemoryStore::new();
        let advisor = StubAdvisor::default();
        let user_id = Uuid::new_v4();

        let first = load_or_generate(&store, &advisor, user_id, "Doctor", None)
            .await
            .unwrap();
        assert_eq!(first.current_step, 1);
        assert!(first.completed_steps.is_empty());
        assert_eq!(first.roadmap_steps["education"], "Medical school");
        assert_eq!(milestone_count(&first.roadmap_steps), 5);

        let second = load_or_generate(&store, &advisor, user_id, "Doctor", None)
            .await
            .unwrap();
        assert_eq!(second.roadmap_id, first.roadmap_id);
        assert_eq!(advisor.calls(), 1);
    }

    #[tokio::test]
    async fn test_newer_prediction_regenerates() {
        let store = MemoryStore::new();
        let advisor = StubAdvisor::default();
        let user_id = Uuid::new_v4();

        let first = load_or_generate(&store, &advisor, user_id, "Doctor", None)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store
            .insert_recommendation(NewRecommendation {
                user_id,
                career: "Doctor",
                confidence_score: None,
                career_details: None,
            })
            .await
            .unwrap();

        let second = load_or_generate(&store, &advisor, user_id, "Doctor", None)
            .await
            .unwrap();
        assert_ne!(second.roadmap_id, first.roadmap_id);
        assert_eq!(advisor.calls(), 2);
    }

    #[tokio::test]
    async fn test_generation_failure_is_upstream_error() {
        let err = load_or_generate(
            &MemoryStore::new(),
            &StubAdvisor::failing(),
            Uuid::new_v4(),
            "Doctor",
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg == FETCH_FAILED));
    }

    #[tokio::test]
    async fn test_complete_step_updates_progress_idempotently() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        load_or_generate(&store, &StubAdvisor::default(), user_id, "Doctor", None)
            .await
            .unwrap();

        let view = complete_step(&store, user_id, "Doctor", 2).await.unwrap();
        assert_eq!(view.completed_steps, vec![2]);
        assert_eq!(view.current_step, 3);

        let again = complete_step(&store, user_id, "Doctor", 2).await.unwrap();
        assert_eq!(again.completed_steps, vec![2]);
        assert_eq!(again.updated_at, view.updated_at);

        let view = complete_step(&store, user_id, "Doctor", 0).await.unwrap();
        assert_eq!(view.completed_steps, vec![0, 2]);
        assert_eq!(view.current_step, 3);
    }

    #[tokio::test]
    async fn test_complete_step_rejects_bad_index_and_missing_roadmap() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let err = complete_step(&store, user_id, "Doctor", 0).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        load_or_generate(&store, &StubAdvisor::default(), user_id, "Doctor", None)
            .await
            .unwrap();
        for index in [-1, 5] {
            let err = complete_step(&store, user_id, "Doctor", index)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }
}
