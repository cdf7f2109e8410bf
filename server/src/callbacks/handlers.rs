//! Webhook Endpoint
//!
//! `POST /api/channel-talk/webhook`: verifies, parses and dispatches event
//! notifications. Verification and parsing complete before any hook runs.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::{instrument, warn};

use super::envelope;
use super::error::{CallbackError, CallbackResult};
use super::signing::{self, MissingSecretPolicy};
use crate::api::AppState;

/// Acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

/// Read the signature header; absent or non-ASCII yields an empty signature.
pub(crate) fn signature_header(headers: &HeaderMap) -> &str {
    headers
        .get(signing::SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// POST /api/channel-talk/webhook
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> CallbackResult<Json<Ack>> {
    let secret = state.config.webhook_secret.as_deref();
    if !signing::verify(
        &body,
        signature_header(&headers),
        secret,
        MissingSecretPolicy::Reject,
    ) {
        warn!("Invalid webhook signature");
        return Err(CallbackError::InvalidSignature);
    }

    let envelopes = envelope::parse(&body).inspect_err(|e| {
        warn!(error = %e, "Rejected malformed webhook payload");
    })?;

    state.events.dispatch_all(&envelopes).await?;

    Ok(Json(Ack { success: true }))
}
