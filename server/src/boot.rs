//! Messenger Boot Configuration
//!
//! Serves the options the client SDK boots with. When a member id is given and
//! a member-hash secret is configured, the response carries the member hash so
//! the secret never has to reach the browser.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::callbacks::signing;
use crate::config::Config;

/// Query parameters for the boot endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootQuery {
    pub member_id: Option<String>,
}

/// Boot options in the SDK's field naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootOptions {
    pub plugin_key: String,
    pub language: String,
    pub hide_channel_button_on_boot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_hash: Option<String>,
}

/// Build boot options, or `None` when no plugin key is configured.
pub fn boot_options(config: &Config, member_id: Option<&str>) -> Option<BootOptions> {
    let plugin_key = config.plugin_key.clone()?;
    let member_id = member_id.filter(|m| !m.is_empty());
    let member_hash = member_id.zip(config.member_hash_secret.as_deref()).map(
        |(member, secret)| signing::member_hash(secret, member),
    );

    Some(BootOptions {
        plugin_key,
        language: config.language.clone(),
        hide_channel_button_on_boot: config.hide_default_button,
        z_index: config.z_index,
        member_id: member_id.map(str::to_string),
        member_hash,
    })
}

/// GET /api/channel-talk/boot
pub async fn get_boot_options(
    State(state): State<AppState>,
    Query(query): Query<BootQuery>,
) -> Result<Json<BootOptions>, StatusCode> {
    boot_options(&state.config, query.member_id.as_deref())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Create the boot router.
pub fn router() -> Router<AppState> {
    Router::new().route("/boot", get(get_boot_options))
}
