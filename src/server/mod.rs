//! HTTP server: the static front end page and the generation endpoint

mod api;
mod error;

use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::response::Html;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ai::OpenRouterClient;
use crate::config::{AiConfig, Config};

/// The fixed front end document, embedded at compile time
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Shared application state, constructed once at start-up and cloned into
/// each request handler. Requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    client: OpenRouterClient,
    ai: AiConfig,
}

impl AppState {
    pub fn new(ai: AiConfig) -> Result<Self> {
        let client = OpenRouterClient::new(
            ai.api_url.clone(),
            ai.api_key.clone().unwrap_or_default(),
            Duration::from_secs(ai.timeout_secs),
        )?;

        Ok(Self { client, ai })
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/generate", post(api::generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Bind the listener and serve until interrupted
pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::new(config.ai)?;
    let app = router(state);

    info!("Starting mailgen on {}", config.server.bind);
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_state(api_url: &str) -> AppState {
        AppState::new(AiConfig {
            api_url: api_url.to_string(),
            api_key: Some("test-key".to_string()),
            ..AiConfig::default()
        })
        .unwrap()
    }

    fn generate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Serve a canned chat completion on an ephemeral port and return the
    /// endpoint URL
    async fn spawn_stub_provider(reply: &'static str) -> String {
        let app = Router::new().route(
            "/chat/completions",
            post(move || async move {
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": reply}}]
                }))
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/chat/completions", addr)
    }

    /// Serve a provider that always fails with the given status and body
    async fn spawn_failing_provider(status: StatusCode, message: &'static str) -> String {
        let app = Router::new().route(
            "/chat/completions",
            post(move || async move { (status, message) }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/chat/completions", addr)
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let app = router(test_state("http://127.0.0.1:9/unused"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/api/generate"));
    }

    #[tokio::test]
    async fn test_empty_email_returns_400() {
        let app = router(test_state("http://127.0.0.1:9/unused"));

        let response = app
            .oneshot(generate_request(json!({"email": "", "mode": "reply"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Email text required");
    }

    #[tokio::test]
    async fn test_invalid_mode_returns_400() {
        let app = router(test_state("http://127.0.0.1:9/unused"));

        let response = app
            .oneshot(generate_request(
                json!({"email": "Hi there", "mode": "unknown"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Invalid mode");
    }

    #[tokio::test]
    async fn test_successful_generation_returns_trimmed_text() {
        let url = spawn_stub_provider("  - Confirm the new meeting time\n\n").await;
        let app = router(test_state(&url));

        let response = app
            .oneshot(generate_request(
                json!({"email": "Can we move the 3pm meeting?", "mode": "condense"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["text"], "- Confirm the new meeting time");
    }

    #[tokio::test]
    async fn test_provider_failure_returns_500() {
        let url = spawn_failing_provider(StatusCode::TOO_MANY_REQUESTS, "quota exceeded").await;
        let app = router(test_state(&url));

        let response = app
            .oneshot(generate_request(
                json!({"email": "Hi there", "mode": "reply"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_validation_rejects_before_any_upstream_call() {
        // An unroutable provider URL: the request must fail on validation
        // without ever attempting the call.
        let app = router(test_state("http://240.0.0.0:1/unreachable"));

        let response = app
            .oneshot(generate_request(json!({"email": "   ", "mode": "condense"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
