//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    boot,
    callbacks::{self, EventRouter},
    config::Config,
    hooks::Hooks,
    snippet,
};

/// Shared application state.
///
/// Read-only after startup; nothing here carries state between requests.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Side-effect hooks used by both endpoints
    pub hooks: Hooks,
    /// Webhook event router
    pub events: Arc<EventRouter>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, hooks: Hooks) -> Self {
        let events = EventRouter::new(hooks.clone(), config.urgent_keywords.clone());
        Self {
            config: Arc::new(config),
            hooks,
            events: Arc::new(events),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_size = state.config.max_body_size;

    let channel_talk = Router::new()
        .merge(callbacks::router())
        .merge(snippet::router())
        .merge(boot::router());

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api/channel-talk", channel_talk)
        // Middleware
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .layer(DefaultBodyLimit::max(max_body_size))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether webhook verification can succeed
    webhook_secret: bool,
    /// Whether snippet verification is enforced
    snippet_token: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        webhook_secret: state.config.webhook_secret.is_some(),
        snippet_token: state.config.snippet_token.is_some(),
    })
}
