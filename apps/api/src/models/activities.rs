use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Free-text study habits and interests. Missing fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct ActivitiesProfile {
    pub preferred_study_time: String,
    pub study_environment: String,
    pub learning_style: String,
    pub study_methods: String,
    pub academic_interests: String,
    pub extracurricular_activities: String,
    pub career_interests: String,
    pub skills: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentActivitiesRow {
    pub user_id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub profile: ActivitiesProfile,
    pub recorded_at: DateTime<Utc>,
}
