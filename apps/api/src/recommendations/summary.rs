use serde::Serialize;
use tracing::warn;

use crate::backend_client::types::{UniversitySummary, UniversitySummaryRequest};
use crate::backend_client::CareerAdvisor;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReply {
    #[serde(flatten)]
    pub summary: UniversitySummary,
    pub is_placeholder: bool,
}

/// Shown when the summary backend fails or returns a section empty.
pub fn placeholder(university_name: &str) -> UniversitySummary {
    let retry = "Please try again later.".to_string();
    UniversitySummary {
        overview: format!("Information about {university_name}"),
        academic_programs: retry.clone(),
        campus_life: retry.clone(),
        achievements: retry.clone(),
        unique_features: retry,
    }
}

pub async fn summarize_university(
    advisor: &dyn CareerAdvisor,
    request: &UniversitySummaryRequest,
) -> SummaryReply {
    match advisor.university_summary(request).await {
        Ok(summary) if summary.is_complete() => SummaryReply {
            summary,
            is_placeholder: false,
        },
        Ok(_) => {
            warn!("Summary for {} is incomplete", request.university_name);
            placeholder_reply(&request.university_name)
        }
        Err(e) => {
            warn!("Summary for {} failed: {e}", request.university_name);
            placeholder_reply(&request.university_name)
        }
    }
}

fn placeholder_reply(name: &str) -> SummaryReply {
    SummaryReply {
        summary: placeholder(name),
        is_placeholder: true,
    }
}
