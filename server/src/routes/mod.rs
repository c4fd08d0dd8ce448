//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The proxy serves the browser scene directly, so every route allows any
//! origin. The render route lifts the default body limit and reads its body
//! itself, after the quota check, so a spent client always sees 429.

pub mod client_key;
pub mod render;

use axum::Router;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use self::client_key::ClientKey;
use crate::state::AppState;

/// Build the full router.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            path = %request.uri().path(),
        )
    });

    Router::new()
        .route("/quota", get(render::quota))
        .route(
            "/render",
            post(move |state: State<AppState>, client: ClientKey, body: Body| {
                render::render(state, client, body, max_body_bytes)
            })
            .layer(DefaultBodyLimit::disable()),
        )
        .route("/healthz", get(healthz))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
