use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Latest recommendation snapshot, upserted per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UniversityPreferenceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub preferred_universities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User bookmark. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedUniversityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub university_name: String,
    pub notes: Option<String>,
    pub saved_at: DateTime<Utc>,
}
