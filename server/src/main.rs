mod config;
mod error;
mod imagegen;
mod quota;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::error::ErrorCode;
use crate::imagegen::ImageGenerate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::ProxyConfig::from_env()?;

    // Initialize the image service (non-fatal: renders answer 500 if config missing).
    let generator: Option<Arc<dyn ImageGenerate>> = match imagegen::config::ImageGenConfig::from_env() {
        Ok(cfg) => {
            let client = imagegen::GeminiClient::new(cfg)?;
            tracing::info!(model = client.model(), "image service initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, code = e.error_code(), "image service not configured; renders disabled");
            None
        }
    };

    let quota = quota::Quota::in_memory(config.quota_limit);
    let state = state::AppState::new(quota.clone(), generator);

    let app = routes::app(state, config.max_body_bytes);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, quota_limit = quota.limit(), "render proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
