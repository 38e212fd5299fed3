use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRecommendationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recommended_career: String,
    pub confidence_score: Option<f64>,
    /// Opaque enrichment payload, stored verbatim after defaults are filled.
    pub career_details: Option<Value>,
    pub recommended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRoadmapRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub career: String,
    pub roadmap_steps: Value,
    pub current_step: i32,
    pub completed_steps: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row per user; `None` fields in an upsert leave the stored value alone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferencesRow {
    pub user_id: Uuid,
    pub preferred_career_fields: Vec<String>,
    pub salary_expectations: Option<String>,
    pub work_life_balance_preference: Option<String>,
    pub preferred_universities: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
