//! Axum-based HTTP gateway for the storyboarding API.
//!
//! Routing, shared state, and the error-to-status mapping live here; the
//! per-endpoint logic is in `handlers`.

mod handlers;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::Config;
use crate::error::ServiceError;
use crate::prompt::{PromptRenderer, TemplateStore};
use crate::session::StyleSessionStore;
use crate::upstream::GenerationClient;

/// Maximum request body size — generous enough for base64 image payloads.
pub const MAX_BODY_SIZE: usize = 50 * 1024 * 1024;
/// Whole-request timeout; upstream calls alone may take up to 60s.
pub const REQUEST_TIMEOUT_SECS: u64 = 90;

/// Shared state for all axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<PromptRenderer>,
    pub client: Arc<GenerationClient>,
    pub sessions: Arc<StyleSessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let store = TemplateStore::load(&config.templates_dir);
        tracing::info!(
            "loaded {} prompt templates from {}",
            store.len(),
            config.templates_dir.display()
        );

        Self {
            renderer: Arc::new(PromptRenderer::new(store)),
            client: Arc::new(GenerationClient::new(&config)),
            sessions: Arc::new(StyleSessionStore::new()),
            config: Arc::new(config),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            // Upstream failures keep their original status where it is a
            // sensible error code.
            ServiceError::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ServiceError::NotConfigured(_)
            | ServiceError::Template(_)
            | ServiceError::MalformedResponse(_)
            | ServiceError::ImageProcessing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route("/health", get(handlers::handle_health))
        .route("/api/generate-image", post(handlers::handle_generate_image))
        .route(
            "/api/generate-suggestions",
            post(handlers::handle_generate_suggestions),
        )
        .route("/api/generate-style", post(handlers::handle_generate_style))
        .route("/api/analyze-style", post(handlers::handle_analyze_style))
        .route(
            "/api/create-style-session",
            post(handlers::handle_create_session),
        )
        .route(
            "/api/style-session/{project_id}",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/generate-storyboard",
            post(handlers::handle_generate_storyboard),
        )
        .route("/api/analyze-story", post(handlers::handle_analyze_story))
        .route("/api/refine-script", post(handlers::handle_refine_script))
        .route("/api/generate-audio", post(handlers::handle_generate_audio))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve per the configuration.
pub async fn run_gateway(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_gateway_with_listener(listener, config).await
}

/// Serve from a pre-bound listener (integration tests bind port 0).
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;

    if config.api_key.is_none() {
        tracing::warn!("no upstream API key configured; generation endpoints will refuse requests");
    }

    let state = AppState::from_config(config);
    let app = build_router(state);

    tracing::info!("storyboard gateway listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
