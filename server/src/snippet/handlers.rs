//! Snippet Endpoint
//!
//! `POST /api/channel-talk/snippet`: verifies the request, resolves the view
//! from `componentId`, runs that view's side effect and renders it.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use tracing::{debug, error, instrument, warn};

use super::types::{Block, InteractionRequest, InteractionResponse};
use super::view::{self, View, MEMO_INPUT};
use crate::api::AppState;
use crate::callbacks::handlers::signature_header;
use crate::callbacks::{signing, CallbackError, CallbackResult};
use crate::hooks::{HookError, Hooks};

/// Resolve the request to a view and produce its blocks.
pub async fn respond(req: &InteractionRequest, hooks: &Hooks) -> Result<Vec<Block>, HookError> {
    let user_id = req.user.id.as_str();
    let blocks = match View::from_component_id(req.component_id.as_deref()) {
        View::Main => view::main_view(&req.user),
        View::ViewOrders => {
            let orders = hooks
                .bounded("orders_for_user", hooks.orders.orders_for_user(user_id))
                .await?;
            view::orders_view(&orders)
        }
        View::IssueCoupon => {
            let code = hooks
                .bounded("issue_coupon", hooks.coupons.issue_coupon(user_id))
                .await?;
            view::coupon_view(&code)
        }
        View::SaveMemo => {
            let memo = req.submitted(MEMO_INPUT).unwrap_or_default();
            hooks
                .bounded("save_memo", hooks.memos.save_memo(user_id, memo))
                .await?;
            view::memo_saved_view(memo)
        }
    };
    Ok(blocks)
}

/// POST /api/channel-talk/snippet
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn handle_snippet(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> CallbackResult<Json<InteractionResponse>> {
    if !signing::verify(
        &body,
        signature_header(&headers),
        state.config.snippet_token.as_deref(),
        state.config.snippet_missing_secret_policy(),
    ) {
        warn!("Invalid snippet signature");
        return Err(CallbackError::InvalidSignature);
    }

    let req: InteractionRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected malformed snippet request");
        CallbackError::MalformedPayload(e.to_string())
    })?;

    debug!(
        user_id = %req.user.id,
        component_id = req.component_id.as_deref().unwrap_or("-"),
        "Snippet request"
    );

    let blocks = respond(&req, &state.hooks).await.map_err(|e| {
        error!(
            user_id = %req.user.id,
            component_id = req.component_id.as_deref().unwrap_or("-"),
            error = %e,
            "Snippet handler failed"
        );
        CallbackError::Handler(e)
    })?;

    Ok(Json(InteractionResponse::new(blocks)))
}
