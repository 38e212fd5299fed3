pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::funnel::handlers as funnel;
use crate::prediction::handlers as prediction;
use crate::profile::handlers as profile;
use crate::recommendations::handlers as recommendations;
use crate::roadmap::handlers as roadmap;
use crate::scores::handlers as scores;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Funnel sessions
        .route("/api/v1/sessions", post(funnel::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(funnel::handle_get_session).delete(funnel::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/navigate",
            post(funnel::handle_navigate),
        )
        // Step 1: scores
        .route(
            "/api/v1/scores",
            get(scores::handle_get_scores).put(scores::handle_put_scores),
        )
        // Step 2: prediction
        .route("/api/v1/predict", post(prediction::handle_predict))
        .route(
            "/api/v1/predict/latest",
            get(prediction::handle_latest_prediction),
        )
        // Step 3: universities
        .route(
            "/api/v1/universities",
            post(recommendations::handle_universities),
        )
        .route(
            "/api/v1/universities/preferences",
            get(recommendations::handle_university_preferences),
        )
        .route(
            "/api/v1/universities/saved",
            get(recommendations::handle_list_saved).post(recommendations::handle_save_university),
        )
        .route(
            "/api/v1/universities/summary",
            post(recommendations::handle_university_summary),
        )
        // Step 4: alternatives
        .route(
            "/api/v1/alternatives",
            post(recommendations::handle_alternatives),
        )
        // Step 5: roadmap
        .route("/api/v1/roadmap", get(roadmap::handle_get_roadmap))
        .route(
            "/api/v1/roadmap/steps/:index/complete",
            post(roadmap::handle_complete_step),
        )
        // Assistant and profile
        .route("/api/v1/chat", post(chat::handle_chat))
        .route(
            "/api/v1/activities",
            get(profile::handle_get_activities).put(profile::handle_put_activities),
        )
        .route("/api/v1/progress", get(profile::handle_progress))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, StubAdvisor};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn scores() -> Value {
        json!({
            "math_score": 80,
            "history_score": 70,
            "physics_score": 90,
            "chemistry_score": 85,
            "biology_score": 75,
            "english_score": 95,
            "geography_score": 60
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(StubAdvisor::default()));
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_full_funnel_walk() {
        let app = build_router(test_state(StubAdvisor::default()));
        let user_id = Uuid::new_v4();

        let (status, session) =
            send(&app, "POST", "/api/v1/sessions", Some(json!({ "user_id": user_id }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let session_id = session["session_id"].as_str().unwrap().to_string();

        let (_, nav) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{session_id}/navigate"),
            Some(json!({ "step": 3 })),
        )
        .await;
        assert_eq!(nav["moved"], false);

        let mut change = scores();
        change["user_id"] = json!(user_id);
        change["session_id"] = json!(session_id);
        let (status, update) = send(&app, "PUT", "/api/v1/scores", Some(change)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(update["gpa"], 79.29);
        assert_eq!(update["saved"], true);

        let (status, prediction) = send(
            &app,
            "POST",
            "/api/v1/predict",
            Some(json!({ "user_id": user_id, "session_id": session_id, "scores": scores() })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(prediction["career"], "Software Engineer");

        let (status, universities) = send(
            &app,
            "POST",
            "/api/v1/universities",
            Some(json!({ "user_id": user_id, "session_id": session_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(universities["status"], "matches");
        assert_eq!(universities["universities"][0]["name"], "MIT");

        let (_, alternatives) = send(
            &app,
            "POST",
            "/api/v1/alternatives",
            Some(json!({ "user_id": user_id, "session_id": session_id })),
        )
        .await;
        assert_eq!(alternatives["analysis_available"], true);

        let (_, nav) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{session_id}/navigate"),
            Some(json!({ "step": 5 })),
        )
        .await;
        assert_eq!(nav["moved"], true);
        assert_eq!(nav["session"]["current_step"], 5);
        assert_eq!(nav["session"]["roadmap"]["career"], "Software Engineer");

        let (status, step) = send(
            &app,
            "POST",
            "/api/v1/roadmap/steps/0/complete",
            Some(json!({ "user_id": user_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(step["current_step"], 1);
        assert_eq!(step["completed_steps"], json!([0]));

        let (_, progress) =
            send(&app, "GET", &format!("/api/v1/progress?user_id={user_id}"), None).await;
        // scores, prediction, universities, alternatives (preferences row)
        assert_eq!(progress["completed"], 4);
        assert_eq!(progress["percentage"], 67);

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/v1/sessions/{session_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_400_with_field() {
        let app = build_router(test_state(StubAdvisor::default()));
        let mut body = scores();
        body["math_score"] = json!(101);
        let (status, error) = send(
            &app,
            "POST",
            "/api/v1/predict",
            Some(json!({ "user_id": Uuid::new_v4(), "scores": body })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            error["error"]["message"],
            "Invalid math score. Must be between 0 and 100."
        );
    }

    #[tokio::test]
    async fn test_predict_backend_down_is_502() {
        let app = build_router(test_state(StubAdvisor::failing()));
        let (status, error) = send(
            &app,
            "POST",
            "/api/v1/predict",
            Some(json!({ "user_id": Uuid::new_v4(), "scores": scores() })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(error["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_chat_falls_back_when_backend_down() {
        let app = build_router(test_state(StubAdvisor::failing()));
        let (status, reply) = send(
            &app,
            "POST",
            "/api/v1/chat",
            Some(json!({ "message": "what GPA do I need?", "gpa": 82.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["isMock"], true);
        assert!(reply["response"].as_str().unwrap().contains("82.5/100"));
    }

    #[tokio::test]
    async fn test_empty_chat_message_rejected() {
        let app = build_router(test_state(StubAdvisor::default()));
        let (status, _) = send(&app, "POST", "/api/v1/chat", Some(json!({ "message": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_scores_for_new_user_default_to_zero() {
        let app = build_router(test_state(StubAdvisor::default()));
        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/v1/scores?user_id={}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gpa"], 0.0);
        assert_eq!(body["scores"]["math_score"], 0);
        assert_eq!(
            body["notice"],
            "No academic scores found. Please enter your scores."
        );
    }

    #[tokio::test]
    async fn test_activities_round_trip_through_upsert() {
        let app = build_router(test_state(StubAdvisor::default()));
        let user_id = Uuid::new_v4();

        let (_, empty) = send(
            &app,
            "GET",
            &format!("/api/v1/activities?user_id={user_id}"),
            None,
        )
        .await;
        assert_eq!(empty["skills"], "");

        let (status, _) = send(
            &app,
            "PUT",
            "/api/v1/activities",
            Some(json!({ "user_id": user_id, "learning_style": "visual" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, saved) = send(
            &app,
            "GET",
            &format!("/api/v1/activities?user_id={user_id}"),
            None,
        )
        .await;
        assert_eq!(saved["learning_style"], "visual");
        assert_eq!(saved["study_methods"], "");
    }
}
