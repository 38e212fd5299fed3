//! Persistence layer: the remote profile store behind a trait.
//!
//! Operations come in four shapes:
//! - read-latest: `Ok(None)` is the not-found outcome, never an error
//! - upsert: overwrite the single current row (preferences, activities)
//! - insert: append to history tables (scores, recommendations, roadmaps, bookmarks)
//! - update: partial mutation of one row (roadmap progress)
//!
//! `AppState` holds an `Arc<dyn ProfileStore>`: `PgStore` when `DATABASE_URL` is
//! set, `MemoryStore` otherwise.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activities::{ActivitiesProfile, StudentActivitiesRow};
use crate::models::career::{CareerRecommendationRow, CareerRoadmapRow, UserPreferencesRow};
use crate::models::scores::AcademicScoreRow;
use crate::models::university::{SavedUniversityRow, UniversityPreferenceRow};
use crate::scores::SubjectScores;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Fields for a new `career_recommendations` row.
pub struct NewRecommendation<'a> {
    pub user_id: Uuid,
    pub career: &'a str,
    pub confidence_score: Option<f64>,
    pub career_details: Option<&'a Value>,
}

/// Partial `user_preferences` upsert. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesPatch {
    pub preferred_career_fields: Option<Vec<String>>,
    pub salary_expectations: Option<String>,
    pub work_life_balance_preference: Option<String>,
    pub preferred_universities: Option<Vec<String>>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn latest_scores(&self, user_id: Uuid) -> Result<Option<AcademicScoreRow>, AppError>;

    async fn insert_scores(
        &self,
        user_id: Uuid,
        scores: &SubjectScores,
        gpa: f64,
    ) -> Result<AcademicScoreRow, AppError>;

    async fn latest_recommendation(
        &self,
        user_id: Uuid,
    ) -> Result<Option<CareerRecommendationRow>, AppError>;

    async fn insert_recommendation(
        &self,
        new: NewRecommendation<'_>,
    ) -> Result<CareerRecommendationRow, AppError>;

    async fn latest_roadmap(
        &self,
        user_id: Uuid,
        career: &str,
    ) -> Result<Option<CareerRoadmapRow>, AppError>;

    async fn insert_roadmap(
        &self,
        user_id: Uuid,
        career: &str,
        roadmap_steps: &Value,
    ) -> Result<CareerRoadmapRow, AppError>;

    /// Returns `None` when no roadmap with `roadmap_id` exists.
    async fn update_roadmap_progress(
        &self,
        roadmap_id: Uuid,
        completed_steps: &[i32],
        current_step: i32,
    ) -> Result<Option<CareerRoadmapRow>, AppError>;

    async fn latest_university_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UniversityPreferenceRow>, AppError>;

    async fn upsert_university_preferences(
        &self,
        user_id: Uuid,
        universities: &[String],
    ) -> Result<UniversityPreferenceRow, AppError>;

    async fn insert_saved_university(
        &self,
        user_id: Uuid,
        university_name: &str,
        notes: Option<&str>,
    ) -> Result<SavedUniversityRow, AppError>;

    /// Newest first.
    async fn saved_universities(&self, user_id: Uuid)
        -> Result<Vec<SavedUniversityRow>, AppError>;

    async fn activities(&self, user_id: Uuid) -> Result<Option<StudentActivitiesRow>, AppError>;

    async fn upsert_activities(
        &self,
        user_id: Uuid,
        profile: &ActivitiesProfile,
    ) -> Result<StudentActivitiesRow, AppError>;

    async fn user_preferences(&self, user_id: Uuid)
        -> Result<Option<UserPreferencesRow>, AppError>;

    async fn upsert_user_preferences(
        &self,
        user_id: Uuid,
        patch: PreferencesPatch,
    ) -> Result<UserPreferencesRow, AppError>;
}
