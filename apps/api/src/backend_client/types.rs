//! Canonical request/response bodies for the upstream backends. One schema per
//! endpoint; see DESIGN.md for the choices made where the backends disagreed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend_client::BackendError;
use crate::scores::SubjectScores;

// ────────────────────────────────────────────────────────────────────────────
// /api/predict
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub career: Option<String>,
    pub confidence_score: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// /api/career-details
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CareerRequest<'a> {
    pub career: &'a str,
}

/// `data` arrives either as an object or as a JSON-encoded string.
#[derive(Debug, Deserialize)]
pub struct CareerDetailsEnvelope {
    #[serde(default)]
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl CareerDetailsEnvelope {
    pub fn into_details(self) -> Result<Value, BackendError> {
        if !self.success {
            return Err(BackendError::Rejected(
                self.error
                    .unwrap_or_else(|| "career details unavailable".to_string()),
            ));
        }
        match self.data {
            Some(Value::String(encoded)) => Ok(serde_json::from_str(&encoded)?),
            Some(value @ Value::Object(_)) => Ok(value),
            _ => Err(BackendError::MissingField("data")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// /api/chatbot-recommend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RecommendRequest<'a> {
    pub career: &'a str,
    pub gpa: f64,
}

/// One recommended university. Reads the backend's capitalised field names
/// and writes snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityRecommendation {
    #[serde(rename(deserialize = "University_Name"))]
    pub name: String,
    #[serde(rename(deserialize = "Rank_Tier"))]
    pub tier: String,
    #[serde(rename(deserialize = "Description"), default)]
    pub description: Option<String>,
    #[serde(rename(deserialize = "Admission_Rate"), default)]
    pub admission_rate: Option<f64>,
    #[serde(rename(deserialize = "Tuition"), default)]
    pub tuition: Option<f64>,
    #[serde(rename(deserialize = "Location"), default)]
    pub location: Option<String>,
    #[serde(rename(deserialize = "Relevant_Majors"), default)]
    pub relevant_majors: Option<Vec<String>>,
    #[serde(rename(deserialize = "Website"), default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub recommended_universities: Vec<UniversityRecommendation>,
    #[serde(default)]
    pub similar_careers: Vec<String>,
    pub error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// /api/analyze-careers and /api/career-roadmap
// ────────────────────────────────────────────────────────────────────────────

/// Scores in the shape the analysis and roadmap backends read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicProfile {
    pub gpa: f64,
    pub subject_mathematics: i32,
    pub subject_history: i32,
    pub subject_physics: i32,
    pub subject_chemistry: i32,
    pub subject_biology: i32,
    pub subject_english: i32,
    pub subject_geography: i32,
}

impl From<&SubjectScores> for AcademicProfile {
    fn from(scores: &SubjectScores) -> Self {
        Self {
            gpa: scores.gpa(),
            subject_mathematics: scores.math_score,
            subject_history: scores.history_score,
            subject_physics: scores.physics_score,
            subject_chemistry: scores.chemistry_score,
            subject_biology: scores.biology_score,
            subject_english: scores.english_score,
            subject_geography: scores.geography_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeCareersRequest<'a> {
    pub careers: &'a [String],
    pub academic_scores: &'a AcademicProfile,
    pub predicted_career: &'a str,
}

/// An alternative career. The analysis fields stay empty when only the bare
/// name list is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeCareer {
    pub career: String,
    #[serde(default)]
    pub matching_score: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub key_skills: Vec<String>,
}

impl AlternativeCareer {
    pub fn bare(career: impl Into<String>) -> Self {
        Self {
            career: career.into(),
            matching_score: None,
            explanation: None,
            key_skills: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeCareersResponse {
    pub analyzed_careers: Option<Vec<AlternativeCareer>>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapRequest<'a> {
    pub career: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_scores: Option<&'a AcademicProfile>,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapResponse {
    pub roadmap: Option<Map<String, Value>>,
    pub error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// /api/university-summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniversityInfo {
    pub rank_tier: Option<String>,
    pub admission_rate: Option<f64>,
    pub tuition: Option<f64>,
    pub location: Option<String>,
    /// Comma-separated.
    pub relevant_majors: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversitySummaryRequest {
    pub university_name: String,
    #[serde(default)]
    pub additional_info: UniversityInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversitySummary {
    pub overview: String,
    pub academic_programs: String,
    pub campus_life: String,
    pub achievements: String,
    pub unique_features: String,
}

impl UniversitySummary {
    /// All five sections must carry text.
    pub fn is_complete(&self) -> bool {
        [
            &self.overview,
            &self.academic_programs,
            &self.campus_life,
            &self.achievements,
            &self.unique_features,
        ]
        .iter()
        .all(|section| !section.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct UniversitySummaryResponse {
    #[serde(default)]
    pub success: bool,
    pub summary: Option<UniversitySummary>,
    pub error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// /api/chat
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub career: Option<String>,
    pub gpa: Option<f64>,
    pub subject_grades: Option<BTreeMap<String, f64>>,
    /// Client-generated conversation token, forwarded unchanged.
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_envelope_with_encoded_string() {
        let envelope: CareerDetailsEnvelope = serde_json::from_value(json!({
            "success": true,
            "data": "{\"description\": \"Builds software\"}"
        }))
        .unwrap();
        let details = envelope.into_details().unwrap();
        assert_eq!(details["description"], "Builds software");
    }

    #[test]
    fn test_details_envelope_with_object() {
        let envelope: CareerDetailsEnvelope = serde_json::from_value(json!({
            "success": true,
            "data": { "salary_range": "$90k-$150k" }
        }))
        .unwrap();
        assert_eq!(envelope.into_details().unwrap()["salary_range"], "$90k-$150k");
    }

    #[test]
    fn test_details_envelope_failure() {
        let envelope: CareerDetailsEnvelope =
            serde_json::from_value(json!({ "success": false, "error": "model offline" }))
                .unwrap();
        assert!(matches!(
            envelope.into_details(),
            Err(BackendError::Rejected(msg)) if msg == "model offline"
        ));
    }

    #[test]
    fn test_university_reads_backend_names_writes_snake_case() {
        let uni: UniversityRecommendation = serde_json::from_value(json!({
            "University_Name": "MIT",
            "Rank_Tier": "Top 5",
            "Tuition": 57000.0
        }))
        .unwrap();
        assert_eq!(uni.name, "MIT");
        assert_eq!(uni.location, None);

        let out = serde_json::to_value(&uni).unwrap();
        assert_eq!(out["name"], "MIT");
        assert_eq!(out["tier"], "Top 5");
    }

    #[test]
    fn test_academic_profile_keys() {
        let scores = SubjectScores {
            math_score: 80,
            history_score: 70,
            physics_score: 90,
            chemistry_score: 85,
            biology_score: 75,
            english_score: 95,
            geography_score: 60,
        };
        let value = serde_json::to_value(AcademicProfile::from(&scores)).unwrap();
        assert_eq!(value["subject_mathematics"], 80);
        assert_eq!(value["gpa"], 79.29);
    }

    #[test]
    fn test_summary_completeness() {
        let mut summary = UniversitySummary {
            overview: "o".into(),
            academic_programs: "a".into(),
            campus_life: "c".into(),
            achievements: "h".into(),
            unique_features: "u".into(),
        };
        assert!(summary.is_complete());
        summary.campus_life = " ".into();
        assert!(!summary.is_complete());
    }
}
