/// Backend client: the single point of entry for all upstream HTTP calls.
///
/// No other module may call the prediction or chat backends directly.
/// Calls are made once: no retry, no local fallback. Callers decide what a
/// failure means for their endpoint.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::scores::SubjectScores;

pub mod types;

use types::{
    AcademicProfile, AlternativeCareer, AnalyzeCareersRequest, AnalyzeCareersResponse,
    CareerDetailsEnvelope, CareerRequest, ChatRequest, ChatResponse, PredictResponse,
    RecommendRequest, RecommendResponse, RoadmapRequest, RoadmapResponse, UniversitySummary,
    UniversitySummaryRequest, UniversitySummaryResponse,
};

pub const PREDICT_PATH: &str = "/api/predict";
pub const CAREER_DETAILS_PATH: &str = "/api/career-details";
pub const RECOMMEND_PATH: &str = "/api/chatbot-recommend";
pub const CAREER_ROADMAP_PATH: &str = "/api/career-roadmap";
pub const ANALYZE_CAREERS_PATH: &str = "/api/analyze-careers";
pub const UNIVERSITY_SUMMARY_PATH: &str = "/api/university-summary";
pub const CHAT_PATH: &str = "/api/chat";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// 2xx response whose body reports a failure.
    #[error("Backend rejected request: {0}")]
    Rejected(String),

    #[error("Backend response missing field '{0}'")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    error: String,
}

/// Everything the service asks of the external backends.
///
/// Carried in `AppState` as `Arc<dyn CareerAdvisor>`; `BackendClient` is the
/// HTTP implementation.
#[async_trait]
pub trait CareerAdvisor: Send + Sync {
    async fn predict(&self, scores: &SubjectScores) -> Result<PredictResponse, BackendError>;

    /// Detail payload for a career, as a JSON object.
    async fn career_details(&self, career: &str) -> Result<Value, BackendError>;

    async fn recommend(&self, career: &str, gpa: f64) -> Result<RecommendResponse, BackendError>;

    async fn analyze_careers(
        &self,
        request: &AnalyzeCareersRequest<'_>,
    ) -> Result<Vec<AlternativeCareer>, BackendError>;

    async fn career_roadmap(
        &self,
        career: &str,
        profile: Option<&AcademicProfile>,
    ) -> Result<Map<String, Value>, BackendError>;

    async fn university_summary(
        &self,
        request: &UniversitySummaryRequest,
    ) -> Result<UniversitySummary, BackendError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    backend_url: String,
    ai_url: String,
}

impl BackendClient {
    pub fn new(backend_url: String, ai_url: String, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            backend_url,
            ai_url,
        })
    }

    /// POSTs `body` as JSON and decodes a 2xx JSON response.
    /// Non-2xx responses become `BackendError::Status`, using the body's
    /// `error` field as the message when present.
    async fn post_json<B, T>(&self, base: &str, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{base}{path}");
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BackendErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Backend {path} returned {status}: {message}");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CareerAdvisor for BackendClient {
    async fn predict(&self, scores: &SubjectScores) -> Result<PredictResponse, BackendError> {
        self.post_json(&self.backend_url, PREDICT_PATH, scores).await
    }

    async fn career_details(&self, career: &str) -> Result<Value, BackendError> {
        let envelope: CareerDetailsEnvelope = self
            .post_json(&self.backend_url, CAREER_DETAILS_PATH, &CareerRequest { career })
            .await?;
        envelope.into_details()
    }

    async fn recommend(&self, career: &str, gpa: f64) -> Result<RecommendResponse, BackendError> {
        let response: RecommendResponse = self
            .post_json(&self.backend_url, RECOMMEND_PATH, &RecommendRequest { career, gpa })
            .await?;
        match response.error {
            Some(error) => Err(BackendError::Rejected(error)),
            None => Ok(response),
        }
    }

    async fn analyze_careers(
        &self,
        request: &AnalyzeCareersRequest<'_>,
    ) -> Result<Vec<AlternativeCareer>, BackendError> {
        let response: AnalyzeCareersResponse = self
            .post_json(&self.backend_url, ANALYZE_CAREERS_PATH, request)
            .await?;
        if let Some(error) = response.error {
            return Err(BackendError::Rejected(error));
        }
        response
            .analyzed_careers
            .ok_or(BackendError::MissingField("analyzed_careers"))
    }

    async fn career_roadmap(
        &self,
        career: &str,
        profile: Option<&AcademicProfile>,
    ) -> Result<Map<String, Value>, BackendError> {
        let request = RoadmapRequest {
            career,
            academic_scores: profile,
        };
        let response: RoadmapResponse = self
            .post_json(&self.backend_url, CAREER_ROADMAP_PATH, &request)
            .await?;
        if let Some(error) = response.error {
            return Err(BackendError::Rejected(error));
        }
        response.roadmap.ok_or(BackendError::MissingField("roadmap"))
    }

    async fn university_summary(
        &self,
        request: &UniversitySummaryRequest,
    ) -> Result<UniversitySummary, BackendError> {
        let response: UniversitySummaryResponse = self
            .post_json(&self.backend_url, UNIVERSITY_SUMMARY_PATH, request)
            .await?;
        if !response.success {
            return Err(BackendError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "Failed to generate summary".to_string()),
            ));
        }
        response.summary.ok_or(BackendError::MissingField("summary"))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.post_json(&self.ai_url, CHAT_PATH, request).await
    }
}
