//! Channel Talk Callback Server - Main Entry Point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use ct_callbacks::{
    api,
    config::Config,
    hooks::{Hooks, OpenApiClient, OpenApiSurvey, SlackAlerts},
};

/// Wire hooks from configuration, falling back to logging hooks.
fn build_hooks(config: &Config) -> Result<Hooks> {
    let mut hooks = Hooks::logging().with_timeout(config.hook_timeout);

    let http = reqwest::Client::builder()
        .timeout(config.hook_timeout + Duration::from_secs(1))
        .build()?;

    if let Some(url) = &config.slack_webhook_url {
        hooks.alerts = Arc::new(SlackAlerts::new(http.clone(), url.clone()));
        info!("Slack chat alerts enabled");
    }

    if let Some((key, secret)) = config.open_api_credentials() {
        let api = OpenApiClient::new(http, config.api_url.clone(), key, secret);
        hooks.surveys = Arc::new(OpenApiSurvey::new(api));
        info!(api_url = %config.api_url, "Open API survey sender enabled");
    }

    Ok(hooks)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ct_callbacks=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Channel Talk callback server"
    );

    let hooks = build_hooks(&config)?;
    let bind_address = config.bind_address.clone();

    // Build application state and router
    let state = api::AppState::new(config, hooks);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
