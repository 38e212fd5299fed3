// Conversational assistant: relays to the chat backend, degrades to a
// locally synthesized reply flagged `isMock`.

pub mod fallback;
pub mod handlers;

use serde::Serialize;
use tracing::warn;

use crate::backend_client::types::ChatRequest;
use crate::backend_client::CareerAdvisor;
use crate::chat::fallback::{synthesize_reply, ChatContext};

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(rename = "isMock")]
    pub is_mock: bool,
}

/// Relays one message. Never fails: any backend problem, including an empty
/// reply, yields a synthetic response instead.
pub async fn respond(advisor: &dyn CareerAdvisor, request: &ChatRequest) -> ChatReply {
    match advisor.chat(request).await {
        Ok(reply) if !reply.response.trim().is_empty() => ChatReply {
            response: reply.response,
            is_mock: false,
        },
        Ok(_) => {
            warn!("Chat backend returned an empty reply; using local fallback");
            mock_reply(request)
        }
        Err(e) => {
            warn!("Chat backend unavailable ({e}); using local fallback");
            mock_reply(request)
        }
    }
}

fn mock_reply(request: &ChatRequest) -> ChatReply {
    let ctx = ChatContext {
        career: request.career.as_deref(),
        gpa: request.gpa,
        subject_grades: request.subject_grades.as_ref(),
    };
    ChatReply {
        response: synthesize_reply(&request.message, &ctx),
        is_mock: true,
    }
}
