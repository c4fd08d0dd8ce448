//! Quota and render routes.

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use super::client_key::ClientKey;
use crate::error::ErrorCode;
use crate::quota::QuotaStatus;
use crate::services::render::{self as render_service, RenderError, RenderOutcome};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub image_url: String,
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
}

impl From<RenderOutcome> for RenderResponse {
    fn from(outcome: RenderOutcome) -> Self {
        Self {
            image_url: outcome.image_url,
            limit: outcome.quota.limit,
            used: outcome.quota.used,
            remaining: outcome.quota.remaining,
        }
    }
}

/// `GET /quota`: the caller's render allowance.
pub async fn quota(State(state): State<AppState>, ClientKey(client): ClientKey) -> Json<QuotaStatus> {
    Json(state.quota.status(&client))
}

/// `POST /render`: restyle a captured scene.
///
/// The body is streamed only after the quota check, and read up to
/// `max_body_bytes`.
pub async fn render(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    body: Body,
    max_body_bytes: usize,
) -> Result<Json<RenderResponse>, RenderError> {
    render_service::check_quota(&state, &client)?;
    let bytes = to_bytes(body, max_body_bytes)
        .await
        .map_err(|_| RenderError::InvalidInput(format!("request body exceeds {max_body_bytes} bytes")))?;
    let outcome = render_service::render(&state, &client, &bytes).await?;
    Ok(Json(outcome.into()))
}

pub(crate) fn render_error_to_status(err: &RenderError) -> StatusCode {
    match err {
        RenderError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
        RenderError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RenderError::ServiceMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        RenderError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        let status = render_error_to_status(&self);
        let mut body = json!({ "error": self.to_string(), "code": self.error_code() });
        match &self {
            Self::QuotaExceeded(quota) => {
                body["limit"] = json!(quota.limit);
                body["used"] = json!(quota.used);
                body["remaining"] = json!(0);
            }
            Self::Upstream { status: Some(upstream), .. } => {
                body["status"] = json!(upstream);
            }
            _ => {}
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
