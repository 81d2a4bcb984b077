//! HTTP API server.
//!
//! Routes, mounted under the configured API prefix:
//!
//! - `POST /agent/fetch-videos` - search for videos on a topic
//! - `POST /agent/create-script` - draft a script with the agent
//! - `POST /transcript/create` - fetch transcripts for video URLs
//!
//! plus `GET /` and `GET /health` at the root.

mod error;
mod handlers;

pub use error::ErrorResponse;
pub use handlers::{
    ScriptResponse, TranscriptRequest, TranscriptResponse, VideoListResponse,
};

use crate::error::{Result, ScriptwrightError};
use crate::orchestrator::Orchestrator;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tracing::info;

/// Shared application state.
pub struct AppState {
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Result<Router> {
    let server = &state.orchestrator.settings().server;
    let cors = cors_layer(&server.cors_origins)?;
    let prefix = normalize_prefix(&server.api_prefix);

    let api = Router::new()
        .route("/agent/fetch-videos", post(handlers::fetch_videos))
        .route("/agent/create-script", post(handlers::create_script))
        .route("/transcript/create", post(handlers::create_transcript));

    let app = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    let app = if prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(&prefix, api)
    };

    Ok(app.layer(cors).with_state(state))
}

/// Bind the listening socket. Port 0 picks a free port.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    Ok(listener)
}

/// Run the server on a bound listener until Ctrl+C.
pub async fn serve(orchestrator: Orchestrator, listener: TcpListener) -> Result<()> {
    let state = Arc::new(AppState::new(orchestrator));
    let app = router(state)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
}

/// Leading slash, no trailing slash; empty for the root.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// CORS for the configured origins. A `*` entry allows any origin without credentials.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|o| o.trim() == "*") {
        return Ok(base.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o.trim().trim_end_matches('/')).map_err(|e| {
                ScriptwrightError::Config(format!("Invalid CORS origin '{}': {}", o, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(base.allow_origin(origins).allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{OpenAIPlanner, Plan, PlanOutput, PlanRun, PlanningAgent};
    use crate::config::{Prompts, Settings};
    use crate::youtube::{
        FetchedVideo, TranscriptSource, VideoSearch, VideoSearchQuery, YoutubeSearch,
    };
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    struct FakeSearch;

    #[async_trait]
    impl VideoSearch for FakeSearch {
        async fn search(&self, query: &VideoSearchQuery) -> Result<Vec<FetchedVideo>> {
            Ok(vec![FetchedVideo {
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
                title: query.search_terms()?,
                thumbnail: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string()),
            }])
        }
    }

    /// Only `BPKmkY_B8EI` has a transcript; every other video has them disabled.
    struct FakeTranscripts;

    #[async_trait]
    impl TranscriptSource for FakeTranscripts {
        async fn fetch_snippets(&self, video_id: &str, _languages: &[String]) -> Result<Vec<String>> {
            if video_id == "BPKmkY_B8EI" {
                Ok(vec!["hello".to_string(), "world".to_string()])
            } else {
                Err(ScriptwrightError::Transcript("Transcripts are disabled".to_string()))
            }
        }
    }

    struct FakeAgent;

    #[async_trait]
    impl PlanningAgent for FakeAgent {
        async fn plan(&self, query: &str) -> Result<Plan> {
            Ok(Plan::single_step(query))
        }

        async fn run_plan(&self, plan: &Plan) -> Result<PlanRun> {
            Ok(PlanRun {
                plan: plan.clone(),
                outputs: PlanOutput::Structured(json!({"output": "Stay curious!"})),
            })
        }
    }

    fn fake_orchestrator(settings: Settings) -> Orchestrator {
        Orchestrator::with_components(
            settings,
            Prompts::default(),
            Arc::new(FakeSearch),
            Arc::new(FakeTranscripts),
            Arc::new(FakeAgent),
        )
    }

    /// Start the router on an ephemeral port and return its base URL.
    async fn spawn(orchestrator: Orchestrator) -> String {
        let app = router(Arc::new(AppState::new(orchestrator))).unwrap();
        let listener = bind("127.0.0.1", 0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn post_json(url: &str, body: Value) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(url)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("api/v1/"), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn test_invalid_cors_origin() {
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
        assert!(cors_layer(&["*".to_string()]).is_ok());
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let base = spawn(fake_orchestrator(Settings::default())).await;

        let root: Value = reqwest::get(format!("{}/", base)).await.unwrap().json().await.unwrap();
        assert_eq!(
            root["message"],
            "Welcome to the AI YouTube Script Generator API!"
        );

        let health: Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_fetch_videos() {
        let base = spawn(fake_orchestrator(Settings::default())).await;
        let (status, body) = post_json(
            &format!("{}/api/v1/agent/fetch-videos", base),
            json!({"topic": "cats", "keywords": "funny, cute"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"videos": [{
                "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "title": "cats funny cute",
                "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
            }]})
        );
    }

    #[tokio::test]
    async fn test_fetch_videos_without_credential_is_server_error() {
        let settings = Settings::default();
        let orchestrator = Orchestrator::with_components(
            settings.clone(),
            Prompts::default(),
            Arc::new(YoutubeSearch::new(settings.youtube.clone())),
            Arc::new(FakeTranscripts),
            Arc::new(FakeAgent),
        );
        let base = spawn(orchestrator).await;

        let (status, body) = post_json(
            &format!("{}/api/v1/agent/fetch-videos", base),
            json!({"topic": "cats"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("videos").is_none());
        assert!(body["detail"].as_str().unwrap().contains("YOUTUBE_API_KEY"));
    }

    #[tokio::test]
    async fn test_blank_topic_is_unprocessable() {
        let base = spawn(fake_orchestrator(Settings::default())).await;
        let (status, body) = post_json(
            &format!("{}/api/v1/agent/fetch-videos", base),
            json!({"topic": "  "}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("topic"));
    }

    #[tokio::test]
    async fn test_create_transcript_keeps_order() {
        let base = spawn(fake_orchestrator(Settings::default())).await;
        let (status, body) = post_json(
            &format!("{}/api/v1/transcript/create", base),
            json!({"video_urls": [
                "https://www.youtube.com/watch?v=wysAcLUQBd0",
                "https://www.youtube.com/watch?v=BPKmkY_B8EI"
            ]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"transcripts": ["", "hello world"]}));
    }

    #[tokio::test]
    async fn test_create_transcript_rejects_malformed_url() {
        let base = spawn(fake_orchestrator(Settings::default())).await;
        let (status, _) = post_json(
            &format!("{}/api/v1/transcript/create", base),
            json!({"video_urls": ["not a url"]}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_script() {
        let base = spawn(fake_orchestrator(Settings::default())).await;
        let (status, body) = post_json(
            &format!("{}/api/v1/agent/create-script", base),
            json!({
                "host_name": "Sarah Tech",
                "channel_name": "Future Insights",
                "transcripts": [],
                "signature_lines": [],
                "additional_instructions": ""
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"script": "Stay curious!"}));
    }

    #[tokio::test]
    async fn test_create_script_requires_host_name() {
        let base = spawn(fake_orchestrator(Settings::default())).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/v1/agent/create-script", base))
            .json(&json!({"channel_name": "Future Insights"}))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_create_script_without_credential_is_server_error() {
        let settings = Settings::default();
        let orchestrator = Orchestrator::with_components(
            settings.clone(),
            Prompts::default(),
            Arc::new(FakeSearch),
            Arc::new(FakeTranscripts),
            Arc::new(OpenAIPlanner::new(settings.agent.clone())),
        );
        let base = spawn(orchestrator).await;

        let (status, body) = post_json(
            &format!("{}/api/v1/agent/create-script", base),
            json!({"host_name": "Sarah", "channel_name": "Insights"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("GOOGLE_API_KEY"));
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let mut settings = Settings::default();
        settings.server.api_prefix = "/v2/".to_string();
        let base = spawn(fake_orchestrator(settings)).await;

        let (status, _) = post_json(
            &format!("{}/v2/agent/fetch-videos", base),
            json!({"topic": "cats"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let missing = reqwest::Client::new()
            .post(format!("{}/api/v1/agent/fetch-videos", base))
            .json(&json!({"topic": "cats"}))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let base = spawn(fake_orchestrator(Settings::default())).await;

        let response = reqwest::Client::new()
            .request(
                reqwest::Method::OPTIONS,
                format!("{}/api/v1/agent/create-script", base),
            )
            .header("Origin", "http://localhost:5173")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_unknown_origin() {
        let base = spawn(fake_orchestrator(Settings::default())).await;

        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("{}/health", base))
            .header("Origin", "http://evil.example")
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await
            .unwrap();

        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}
