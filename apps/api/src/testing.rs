//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::backend_client::types::{
    AcademicProfile, AlternativeCareer, AnalyzeCareersRequest, ChatRequest, ChatResponse,
    PredictResponse, RecommendResponse, UniversityRecommendation, UniversitySummary,
    UniversitySummaryRequest,
};
use crate::backend_client::{BackendError, CareerAdvisor};
use crate::config::Config;
use crate::errors::AppError;
use crate::funnel::SessionRegistry;
use crate::models::activities::{ActivitiesProfile, StudentActivitiesRow};
use crate::models::career::{CareerRecommendationRow, CareerRoadmapRow, UserPreferencesRow};
use crate::models::scores::AcademicScoreRow;
use crate::models::university::{SavedUniversityRow, UniversityPreferenceRow};
use crate::scores::SubjectScores;
use crate::state::AppState;
use crate::store::{MemoryStore, NewRecommendation, PreferencesPatch, ProfileStore};

/// Canned backend. Every call is counted; `failing()` rejects everything.
pub struct StubAdvisor {
    pub predicted_career: Option<String>,
    /// `None` makes the details call fail.
    pub details: Option<Value>,
    pub universities: Vec<UniversityRecommendation>,
    pub similar_careers: Vec<String>,
    pub analysis_fails: bool,
    /// Analysis succeeds with an empty list.
    pub analysis_empty: bool,
    pub summary_complete: bool,
    pub fail_all: bool,
    pub calls: AtomicUsize,
}

impl Default for StubAdvisor {
    fn default() -> Self {
        Self {
            predicted_career: Some("Software Engineer".to_string()),
            details: Some(json!({
                "description": "Designs and builds software",
                "salary_range": "$90k-$150k",
                "work_life_balance": { "rating": 7 },
                "skills": ["Programming"],
            })),
            universities: vec![university("MIT"), university("Stanford University")],
            similar_careers: vec!["Surgeon".to_string(), "Pharmacist".to_string()],
            analysis_fails: false,
            analysis_empty: false,
            summary_complete: true,
            fail_all: false,
            calls: AtomicUsize::new(0),
        }
    }
}

impl StubAdvisor {
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            Err(BackendError::Status {
                status: 503,
                message: "stub backend down".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CareerAdvisor for StubAdvisor {
    async fn predict(&self, _scores: &SubjectScores) -> Result<PredictResponse, BackendError> {
        self.enter()?;
        Ok(PredictResponse {
            career: self.predicted_career.clone(),
            confidence_score: Some(0.85),
        })
    }

    async fn career_details(&self, _career: &str) -> Result<Value, BackendError> {
        self.enter()?;
        self.details
            .clone()
            .ok_or_else(|| BackendError::Rejected("no details".to_string()))
    }

    async fn recommend(&self, _career: &str, _gpa: f64) -> Result<RecommendResponse, BackendError> {
        self.enter()?;
        Ok(RecommendResponse {
            recommended_universities: self.universities.clone(),
            similar_careers: self.similar_careers.clone(),
            error: None,
        })
    }

    async fn analyze_careers(
        &self,
        request: &AnalyzeCareersRequest<'_>,
    ) -> Result<Vec<AlternativeCareer>, BackendError> {
        self.enter()?;
        if self.analysis_fails {
            return Err(BackendError::Rejected("analysis offline".to_string()));
        }
        if self.analysis_empty {
            return Ok(Vec::new());
        }
        Ok(request
            .careers
            .iter()
            .map(|career| AlternativeCareer {
                career: career.clone(),
                matching_score: Some(0.9),
                explanation: Some(format!("{career} suits {}", request.predicted_career)),
                key_skills: vec!["Empathy".to_string()],
            })
            .collect())
    }

    async fn career_roadmap(
        &self,
        _career: &str,
        _profile: Option<&AcademicProfile>,
    ) -> Result<Map<String, Value>, BackendError> {
        self.enter()?;
        let roadmap = json!({ "education": "Medical school", "timeline_milestones": [] });
        Ok(roadmap.as_object().cloned().unwrap_or_default())
    }

    async fn university_summary(
        &self,
        request: &UniversitySummaryRequest,
    ) -> Result<UniversitySummary, BackendError> {
        self.enter()?;
        let campus_life = if self.summary_complete { "Lively" } else { "" };
        Ok(UniversitySummary {
            overview: format!("About {}", request.university_name),
            academic_programs: "Engineering".to_string(),
            campus_life: campus_life.to_string(),
            achievements: "Many".to_string(),
            unique_features: "Hackathons".to_string(),
        })
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.enter()?;
        Ok(ChatResponse {
            response: format!(
                "backend says hi to {}",
                request.session_id.as_deref().unwrap_or("anonymous")
            ),
        })
    }
}

/// A store whose every call fails, for the degraded paths.
pub struct FailingStore;

fn offline() -> AppError {
    AppError::Internal(anyhow::anyhow!("store offline"))
}

#[async_trait]
impl ProfileStore for FailingStore {
    async fn latest_scores(&self, _user_id: Uuid) -> Result<Option<AcademicScoreRow>, AppError> {
        Err(offline())
    }

    async fn insert_scores(
        &self,
        _user_id: Uuid,
        _scores: &SubjectScores,
        _gpa: f64,
    ) -> Result<AcademicScoreRow, AppError> {
        Err(offline())
    }

    async fn latest_recommendation(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<CareerRecommendationRow>, AppError> {
        Err(offline())
    }

    async fn insert_recommendation(
        &self,
        _new: NewRecommendation<'_>,
    ) -> Result<CareerRecommendationRow, AppError> {
        Err(offline())
    }

    async fn latest_roadmap(
        &self,
        _user_id: Uuid,
        _career: &str,
    ) -> Result<Option<CareerRoadmapRow>, AppError> {
        Err(offline())
    }

    async fn insert_roadmap(
        &self,
        _user_id: Uuid,
        _career: &str,
        _roadmap_steps: &Value,
    ) -> Result<CareerRoadmapRow, AppError> {
        Err(offline())
    }

    async fn update_roadmap_progress(
        &self,
        _roadmap_id: Uuid,
        _completed_steps: &[i32],
        _current_step: i32,
    ) -> Result<Option<CareerRoadmapRow>, AppError> {
        Err(offline())
    }

    async fn latest_university_preferences(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<UniversityPreferenceRow>, AppError> {
        Err(offline())
    }

    async fn upsert_university_preferences(
        &self,
        _user_id: Uuid,
        _universities: &[String],
    ) -> Result<UniversityPreferenceRow, AppError> {
        Err(offline())
    }

    async fn insert_saved_university(
        &self,
        _user_id: Uuid,
        _university_name: &str,
        _notes: Option<&str>,
    ) -> Result<SavedUniversityRow, AppError> {
        Err(offline())
    }

    async fn saved_universities(
        &self,
        _user_id: Uuid,
    ) -> Result<Vec<SavedUniversityRow>, AppError> {
        Err(offline())
    }

    async fn activities(&self, _user_id: Uuid) -> Result<Option<StudentActivitiesRow>, AppError> {
        Err(offline())
    }

    async fn upsert_activities(
        &self,
        _user_id: Uuid,
        _profile: &ActivitiesProfile,
    ) -> Result<StudentActivitiesRow, AppError> {
        Err(offline())
    }

    async fn user_preferences(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<UserPreferencesRow>, AppError> {
        Err(offline())
    }

    async fn upsert_user_preferences(
        &self,
        _user_id: Uuid,
        _patch: PreferencesPatch,
    ) -> Result<UserPreferencesRow, AppError> {
        Err(offline())
    }
}

pub fn university(name: &str) -> UniversityRecommendation {
    UniversityRecommendation {
        name: name.to_string(),
        tier: "Top 10".to_string(),
        description: None,
        admission_rate: None,
        tuition: None,
        location: None,
        relevant_majors: None,
        website: None,
    }
}

pub fn test_config() -> Config {
    Config {
        backend_url: "http://backend.invalid".to_string(),
        ai_url: "http://ai.invalid".to_string(),
        database_url: None,
        upstream_timeout: Duration::from_secs(1),
        session_ttl: Duration::from_secs(60 * 60),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(advisor: StubAdvisor) -> AppState {
    test_state_with(Arc::new(advisor))
}

/// Keeps a handle on the advisor so tests can read its call count.
pub fn test_state_with(advisor: Arc<StubAdvisor>) -> AppState {
    AppState {
        store: Arc::new(MemoryStore::new()),
        advisor,
        sessions: SessionRegistry::new(),
        config: test_config(),
    }
}

/// Default advisor over a store that rejects everything.
pub fn failing_store_state() -> AppState {
    AppState {
        store: Arc::new(FailingStore),
        ..test_state(StubAdvisor::default())
    }
}
