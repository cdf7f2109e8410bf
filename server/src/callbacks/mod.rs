//! Signed Platform Callbacks
//!
//! Signature verification, envelope parsing and event routing for the
//! webhook endpoint. The snippet endpoint reuses the signing and error types.

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod router;
pub mod signing;

use axum::routing::post;
use axum::Router;

use crate::api::AppState;

pub use error::{CallbackError, CallbackResult};
pub use router::{Dispatched, EventKind, EventRouter};

/// Create the webhook router.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(handlers::receive_event))
}
