//! Interactive Snippet
//!
//! Button- and form-driven panel rendered next to a chat. Each request is
//! answered with a full, versioned block list.

pub mod handlers;
pub mod types;
pub mod view;

use axum::routing::post;
use axum::Router;

use crate::api::AppState;

pub use types::{Block, InteractionRequest, InteractionResponse, PROTOCOL_VERSION};
pub use view::View;

/// Create the snippet router.
pub fn router() -> Router<AppState> {
    Router::new().route("/snippet", post(handlers::handle_snippet))
}
