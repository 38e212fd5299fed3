use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::funnel::steps::Step;
use crate::prediction::Prediction;
use crate::recommendations::alternatives::AlternativesOutcome;
use crate::recommendations::universities::UniversityOutcome;
use crate::roadmap::RoadmapView;
use crate::scores::{ScoreDraft, SubjectScores};

/// Everything one pass through the funnel has produced so far.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelSession {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub current_step: Step,
    pub draft: ScoreDraft,
    /// Set once all seven scores are present.
    pub scores: Option<SubjectScores>,
    pub prediction: Option<Prediction>,
    pub universities: Option<UniversityOutcome>,
    pub alternatives: Option<AlternativesOutcome>,
    pub roadmap: Option<RoadmapView>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub session: FunnelSession,
    pub step_title: &'static str,
    pub gpa: Option<f64>,
    pub unlocked_steps: Vec<Step>,
}

impl FunnelSession {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id,
            current_step: Step::AcademicScores,
            draft: ScoreDraft::default(),
            scores: None,
            prediction: None,
            universities: None,
            alternatives: None,
            roadmap: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the result shown by `step` is present.
    pub fn has_result_for(&self, step: Step) -> bool {
        match step {
            Step::AcademicScores => self.scores.is_some(),
            Step::Prediction => self.prediction.is_some(),
            Step::Universities => self.universities.is_some(),
            Step::Alternatives => self.alternatives.is_some(),
            Step::Roadmap => self.roadmap.is_some(),
        }
    }

    pub fn can_enter(&self, target: Step) -> bool {
        target.prerequisites().all(|s| self.has_result_for(s))
    }

    /// Moves to `target` if it is reachable. Returns whether the step changed
    /// hands; an unreachable target leaves the session untouched.
    pub fn navigate(&mut self, target: Step) -> bool {
        if !self.can_enter(target) {
            return false;
        }
        self.current_step = target;
        true
    }

    pub fn unlocked_steps(&self) -> Vec<Step> {
        Step::ALL
            .into_iter()
            .filter(|s| self.can_enter(*s))
            .collect()
    }

    pub fn record_draft(&mut self, draft: ScoreDraft) {
        self.draft = draft;
        self.scores = draft.complete();
    }

    pub fn record_scores(&mut self, scores: SubjectScores) {
        self.record_draft(ScoreDraft::from(scores));
    }

    /// A new prediction invalidates every downstream result and lands the
    /// session on the prediction step.
    pub fn record_prediction(&mut self, prediction: Prediction) {
        self.prediction = Some(prediction);
        self.universities = None;
        self.alternatives = None;
        self.roadmap = None;
        self.current_step = Step::Prediction;
    }

    /// Caches `view` if it belongs to the current prediction. A roadmap
    /// fetched for a career the session has since moved away from is dropped.
    pub fn attach_roadmap(&mut self, view: RoadmapView) -> bool {
        let current = self.prediction.as_ref().map(|p| p.career.as_str());
        if current != Some(view.career.as_str()) {
            return false;
        }
        self.roadmap = Some(view);
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.clone(),
            step_title: self.current_step.title(),
            gpa: self.draft.gpa(),
            unlocked_steps: self.unlocked_steps(),
        }
    }
}

/// Sessions older than this are dropped unless configured otherwise.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Live funnel sessions keyed by session id.
///
/// Updates for a session that has been closed are dropped: `update` returns
/// `None` and the late result is discarded. A session past its TTL counts as
/// closed and is removed on the next insert or sweep.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, FunnelSession>>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_expired(&self, session: &FunnelSession, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.created_at)
            .to_std()
            .map_or(false, |age| age > self.ttl)
    }

    pub async fn insert(&self, session: FunnelSession) {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        sessions.retain(|_, s| !self.is_expired(s, now));
        sessions.insert(session.session_id, session);
    }

    pub async fn get(&self, session_id: Uuid) -> Option<FunnelSession> {
        let now = Utc::now();
        self.inner
            .read()
            .await
            .get(&session_id)
            .filter(|s| !self.is_expired(s, now))
            .cloned()
    }

    pub async fn update<F, R>(&self, session_id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut FunnelSession) -> R,
    {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&session_id) {
            Some(s) if !self.is_expired(s, now) => Some(f(s)),
            _ => None,
        }
    }

    pub async fn remove(&self, session_id: Uuid) -> bool {
        self.inner.write().await.remove(&session_id).is_some()
    }

    /// Drops every expired session. Returns how many were removed.
    pub async fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::alternatives::AlternativesOutcome;

    fn prediction() -> Prediction {
        Prediction {
            career: "Software Engineer".into(),
            confidence_score: Some(0.8),
            details: None,
        }
    }

    fn universities() -> UniversityOutcome {
        UniversityOutcome::NoMatches {
            message: "none".into(),
            similar_careers: vec![],
        }
    }

    #[test]
    fn test_starts_on_step_one_with_only_step_one_unlocked() {
        let session = FunnelSession::new(Uuid::new_v4());
        assert_eq!(session.current_step, Step::AcademicScores);
        assert_eq!(session.unlocked_steps(), vec![Step::AcademicScores]);
    }

    #[test]
    fn test_unreached_step_is_noop() {
        let mut session = FunnelSession::new(Uuid::new_v4());
        assert!(!session.navigate(Step::Universities));
        assert_eq!(session.current_step, Step::AcademicScores);
    }

    #[test]
    fn test_forward_gating_follows_results() {
        let mut session = FunnelSession::new(Uuid::new_v4());
        session.record_scores(SubjectScores::default());
        assert!(session.navigate(Step::Prediction));
        assert!(!session.navigate(Step::Universities));

        session.record_prediction(prediction());
        assert!(session.navigate(Step::Universities));
        assert!(!session.can_enter(Step::Alternatives));

        session.universities = Some(universities());
        assert!(session.navigate(Step::Alternatives));
        assert!(!session.can_enter(Step::Roadmap));

        session.alternatives = Some(AlternativesOutcome {
            predicted_career: "Software Engineer".into(),
            careers: vec![],
            analysis_available: false,
            notice: None,
        });
        assert!(session.navigate(Step::Roadmap));
    }

    #[test]
    fn test_backward_navigation_is_free() {
        let mut session = FunnelSession::new(Uuid::new_v4());
        session.record_scores(SubjectScores::default());
        session.record_prediction(prediction());
        session.universities = Some(universities());
        assert!(session.navigate(Step::Universities));
        assert!(session.navigate(Step::AcademicScores));
        assert!(session.navigate(Step::Universities));
    }

    #[test]
    fn test_partial_draft_does_not_unlock_prediction() {
        let mut session = FunnelSession::new(Uuid::new_v4());
        session.record_draft(ScoreDraft {
            math_score: Some(90),
            ..ScoreDraft::default()
        });
        assert!(!session.can_enter(Step::Prediction));
        assert_eq!(session.snapshot().gpa, Some(90.0));
    }

    #[test]
    fn test_new_prediction_clears_downstream_results() {
        let mut session = FunnelSession::new(Uuid::new_v4());
        session.record_scores(SubjectScores::default());
        session.record_prediction(prediction());
        session.universities = Some(universities());
        session.current_step = Step::Universities;

        session.record_prediction(prediction());

        assert!(session.universities.is_none());
        assert_eq!(session.current_step, Step::Prediction);
    }

    fn roadmap_for(career: &str) -> RoadmapView {
        RoadmapView {
            roadmap_id: Uuid::new_v4(),
            career: career.into(),
            roadmap_steps: serde_json::json!({}),
            current_step: 1,
            completed_steps: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_roadmap_for_replaced_prediction_is_dropped() {
        let mut session = FunnelSession::new(Uuid::new_v4());
        session.record_scores(SubjectScores::default());
        session.record_prediction(prediction());

        // A re-prediction landed while the old career's roadmap was in flight.
        session.record_prediction(Prediction {
            career: "Nurse".into(),
            ..prediction()
        });

        assert!(!session.attach_roadmap(roadmap_for("Software Engineer")));
        assert!(session.roadmap.is_none());
        assert!(session.attach_roadmap(roadmap_for("Nurse")));
        assert_eq!(session.roadmap.map(|r| r.career).as_deref(), Some("Nurse"));
    }

    #[tokio::test]
    async fn test_update_after_remove_is_discarded() {
        let registry = SessionRegistry::new();
        let session = FunnelSession::new(Uuid::new_v4());
        let id = session.session_id;
        registry.insert(session).await;

        assert!(registry.remove(id).await);
        let applied = registry
            .update(id, |s| s.record_prediction(prediction()))
            .await;

        assert!(applied.is_none());
        assert!(registry.get(id).await.is_none());
    }

    fn aged(days: i64) -> FunnelSession {
        let mut session = FunnelSession::new(Uuid::new_v4());
        session.created_at = Utc::now() - chrono::Duration::days(days);
        session
    }

    #[tokio::test]
    async fn test_expired_sessions_are_evicted_on_insert() {
        let registry = SessionRegistry::with_ttl(Duration::from_secs(60 * 60));
        for _ in 0..100 {
            registry.insert(aged(30)).await;
        }
        // Each insert clears the stale ones before it.
        assert_eq!(registry.len().await, 1);

        let fresh = FunnelSession::new(Uuid::new_v4());
        let fresh_id = fresh.session_id;
        registry.insert(fresh).await;

        assert_eq!(registry.len().await, 1);
        assert!(registry.get(fresh_id).await.is_some());
    }

    #[tokio::test]
    async fn test_expired_session_is_closed() {
        let registry = SessionRegistry::with_ttl(Duration::from_secs(60));
        let stale = aged(1);
        let id = stale.session_id;
        registry.inner.write().await.insert(id, stale);

        assert!(registry.get(id).await.is_none());
        assert!(registry.update(id, |s| s.navigate(Step::Prediction)).await.is_none());
        assert_eq!(registry.prune_expired().await, 1);
        assert_eq!(registry.len().await, 0);
    }
}
