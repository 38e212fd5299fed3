// Prediction Proxy: scores in, predicted career out, enriched and persisted.

pub mod handlers;
pub mod service;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::career::CareerRecommendationRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub career: String,
    pub confidence_score: Option<f64>,
    /// Career detail payload with defaults filled, when enrichment succeeded.
    pub details: Option<Value>,
}

impl From<CareerRecommendationRow> for Prediction {
    fn from(row: CareerRecommendationRow) -> Self {
        Self {
            career: row.recommended_career,
            confidence_score: row.confidence_score,
            details: row.career_details,
        }
    }
}
