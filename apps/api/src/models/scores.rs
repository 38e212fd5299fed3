use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scores::SubjectScores;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AcademicScoreRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub math_score: i32,
    pub history_score: i32,
    pub physics_score: i32,
    pub chemistry_score: i32,
    pub biology_score: i32,
    pub english_score: i32,
    pub geography_score: i32,
    pub gpa: f64,
    pub recorded_at: DateTime<Utc>,
}

impl AcademicScoreRow {
    pub fn scores(&self) -> SubjectScores {
        SubjectScores {
            math_score: self.math_score,
            history_score: self.history_score,
            physics_score: self.physics_score,
            chemistry_score: self.chemistry_score,
            biology_score: self.biology_score,
            english_score: self.english_score,
            geography_score: self.geography_score,
        }
    }
}
