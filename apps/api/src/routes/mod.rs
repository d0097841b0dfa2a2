pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::chat::handlers as chat;
use crate::state::AppState;
use crate::web::pages;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML pages
        .route("/", get(pages::dashboard_page))
        .route(
            "/assessment",
            get(pages::assessment_page).post(pages::submit_assessment),
        )
        .route("/chat", get(pages::new_chat))
        .route("/chat/:id", get(pages::chat_page).post(pages::submit_chat))
        .route("/chat/:id/reset", post(pages::reset_chat))
        // JSON API
        .route(
            "/api/v1/assessments",
            post(assessment::handle_create_assessment),
        )
        .route("/api/v1/chat/sessions", post(chat::handle_create_session))
        .route(
            "/api/v1/chat/sessions/:id",
            get(chat::handle_get_session).delete(chat::handle_end_session),
        )
        .route(
            "/api/v1/chat/sessions/:id/messages",
            post(chat::handle_send_message),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::guardrail::REFUSAL_MESSAGE;
    use crate::config::Config;
    use crate::llm_client::fake::FakeCompletionClient;
    use crate::llm_client::CompletionClient;

    const FACTORY_REPLY: &str = r#"{"workplace_type":"Factory","employees_count":12,"hazards":[{"hazard":"Noise","category":"Physical","risk_level":"High","recommended_measures":"Provide ear protection"}]}"#;

    fn app_with(llm: Option<Arc<FakeCompletionClient>>) -> (Router, AppState) {
        let config = Config::for_tests(llm.as_ref().map(|_| "test-key"));
        let llm = llm.map(|c| c as Arc<dyn CompletionClient>);
        let state = AppState::new(config, llm);
        (build_router(state.clone()), state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_degraded_without_credential() {
        let (app, _) = app_with(None);
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_factory_form_renders_single_hazard_card() {
        let llm = Arc::new(FakeCompletionClient::replying(&[FACTORY_REPLY]));
        let (app, _) = app_with(Some(llm.clone()));

        let response = app
            .oneshot(form_post(
                "/assessment",
                "workplace_type=Factory&employees_count=12&hazards_description=loud+machinery",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert_eq!(html.matches("<details class=\"hazard-box\">").count(), 1);
        assert!(html.contains("<summary>Noise</summary>"));
        assert!(html.contains("<b>Category:</b> Physical"));
        assert!(html.contains("<b>Risk Level:</b> High"));
        assert!(html.contains("<b>Recommended Measures:</b> Provide ear protection"));
        assert_eq!(llm.calls(), 1);
        assert!(llm.prompts()[0].contains("loud machinery"));
    }

    #[tokio::test]
    async fn test_assessment_api_falls_back_to_raw_text() {
        let llm = Arc::new(FakeCompletionClient::replying(&["Noise. Dust. Heat."]));
        let (app, _) = app_with(Some(llm));

        let response = app
            .oneshot(json_post(
                "/api/v1/assessments",
                json!({"workplace_type": "Bakery", "employees_count": 5, "hazards_description": "ovens"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "raw");
        assert_eq!(body["raw_text"], "Noise. Dust. Heat.");
    }

    #[tokio::test]
    async fn test_assessment_api_rejects_zero_employees_without_calling_service() {
        let llm = Arc::new(FakeCompletionClient::default());
        let (app, _) = app_with(Some(llm.clone()));

        let response = app
            .oneshot(json_post(
                "/api/v1/assessments",
                json!({"workplace_type": "Office", "employees_count": 0, "hazards_description": ""}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_assessment_api_malformed_count_is_a_validation_error() {
        let llm = Arc::new(FakeCompletionClient::default());
        let (app, _) = app_with(Some(llm.clone()));

        for count in [json!(-1), json!(5_000_000_000u64), json!("twelve")] {
            let response = app
                .clone()
                .oneshot(json_post(
                    "/api/v1/assessments",
                    json!({"workplace_type": "Office", "employees_count": count, "hazards_description": "cables"}),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_api_malformed_body_is_a_validation_error() {
        let llm = Arc::new(FakeCompletionClient::default());
        let (app, state) = app_with(Some(llm.clone()));
        let (id, session) = state.sessions.create().await;

        let response = app
            .oneshot(json_post(
                &format!("/api/v1/chat/sessions/{id}/messages"),
                json!({"text": "Ladder safety?"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(session.lock().await.transcript().len(), 1);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_shows_inline_banner() {
        let llm = Arc::new(FakeCompletionClient::failing(
            crate::llm_client::LlmError::Api {
                status: 429,
                message: "Quota exceeded".into(),
            },
        ));
        let (app, _) = app_with(Some(llm));

        let response = app
            .oneshot(form_post(
                "/assessment",
                "workplace_type=Factory&employees_count=3&hazards_description=dust",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = body_string(response).await;
        assert!(html.contains("Quota exceeded"));
        assert!(!html.contains("hazard-box\">"));
    }

    #[tokio::test]
    async fn test_off_topic_chat_is_blocked_and_service_untouched() {
        let llm = Arc::new(FakeCompletionClient::default());
        let (app, state) = app_with(Some(llm.clone()));
        let (id, session) = state.sessions.create().await;

        let response = app
            .oneshot(form_post(
                &format!("/chat/{id}"),
                "message=What%27s+the+weather+today%3F",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(llm.calls(), 0);
        let session = session.lock().await;
        let visible = session.transcript().visible_turns();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].text, "What's the weather today?");
        assert_eq!(visible[1].text, REFUSAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_api_round_trip() {
        let llm = Arc::new(FakeCompletionClient::replying(&["Use guard rails."]));
        let (app, _) = app_with(Some(llm));

        let response = app
            .clone()
            .oneshot(json_post("/api/v1/chat/sessions", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = serde_json::from_str(&body_string(response).await).unwrap();
        let id = created["session_id"].as_str().unwrap().to_string();
        assert_eq!(created["transcript"], json!([]));

        let response = app
            .clone()
            .oneshot(json_post(
                &format!("/api/v1/chat/sessions/{id}/messages"),
                json!({"message": "Scaffold safety tips?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let sent: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(sent["outcome"], "replied");
        assert_eq!(sent["reply"], "Use guard rails.");
        assert_eq!(
            sent["transcript"],
            json!([
                {"role": "user", "text": "Scaffold safety tips?"},
                {"role": "model", "text": "Use guard rails."}
            ])
        );

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/chat/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get(&format!("/api/v1/chat/sessions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_degraded_mode_blocks_every_submit_without_mutation() {
        let (app, state) = app_with(None);
        let (id, session) = state.sessions.create().await;

        let response = app
            .clone()
            .oneshot(form_post(
                "/assessment",
                "workplace_type=Factory&employees_count=12&hazards_description=loud+machinery",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let html = body_string(response).await;
        assert_eq!(html.matches("GOOGLE_API_KEY not found").count(), 1);
        assert!(!html.contains("Hazard Assessment Results"));

        for message in ["Ladder safety?", "What's the weather today?"] {
            let response = app
                .clone()
                .oneshot(form_post(
                    &format!("/chat/{id}"),
                    &format!("message={}", message.replace(' ', "+").replace('?', "%3F").replace('\'', "%27")),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
            let html = body_string(response).await;
            assert_eq!(html.matches("GOOGLE_API_KEY not found").count(), 1);
        }

        let response = app
            .clone()
            .oneshot(json_post(
                &format!("/api/v1/chat/sessions/{id}/messages"),
                json!({"message": "Hazard?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "CONFIG_ERROR");

        let response = app
            .oneshot(json_post(
                "/api/v1/assessments",
                json!({"workplace_type": "Factory", "employees_count": 12, "hazards_description": "noise"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(session.lock().await.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_new_chat_redirects_to_session_page() {
        let (app, state) = app_with(None);
        let response = app.clone().oneshot(get("/chat")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert!(location.starts_with("/chat/"));
        assert_eq!(state.sessions.len().await, 1);

        let response = app.oneshot(get(&location)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_chat_session_is_not_found() {
        let (app, _) = app_with(None);
        let response = app
            .oneshot(get("/chat/00000000-0000-0000-0000-000000000000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_clears_visible_transcript() {
        let llm = Arc::new(FakeCompletionClient::default());
        let (app, state) = app_with(Some(llm));
        let (id, session) = state.sessions.create().await;
        session
            .lock()
            .await
            .append(crate::models::chat::ChatTurn::user("hazard"));

        let response = app
            .oneshot(form_post(&format!("/chat/{id}/reset"), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(session.lock().await.transcript().len(), 1);
    }
}
