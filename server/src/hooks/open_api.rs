//! Channel Talk Open API Client
//!
//! Minimal client for the platform's REST API, authenticated with the
//! `x-access-key` / `x-access-secret` header pair. Used to send the
//! satisfaction survey into a chat once it closes.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{HookError, SurveySender};
use crate::callbacks::envelope::Entity;

/// Default Open API base URL.
pub const DEFAULT_API_URL: &str = "https://api.channel.io";

/// Survey message sent into a closed chat.
const SURVEY_TEXT: &str =
    "상담은 만족스러우셨나요? 1(매우 불만족)~5(매우 만족) 중 하나를 답장으로 남겨주세요.";

/// Open API client.
#[derive(Clone)]
pub struct OpenApiClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
    access_secret: String,
}

impl OpenApiClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        access_key: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
            access_secret: access_secret.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(resp: reqwest::Response) -> Result<Value, HookError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            warn!(status = status.as_u16(), body = %preview, "Open API request failed");
            return Err(HookError::Failed(format!("Open API returned HTTP {status}")));
        }
        Ok(resp.json().await?)
    }

    /// `POST /open/v5/user-chats/{id}/messages` with a single text block.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<Value, HookError> {
        let resp = self
            .client
            .post(self.url(&format!("/open/v5/user-chats/{chat_id}/messages")))
            .header("x-access-key", &self.access_key)
            .header("x-access-secret", &self.access_secret)
            .json(&message_body(text))
            .send()
            .await?;
        Self::check(resp).await
    }
}

impl std::fmt::Debug for OpenApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn message_body(text: &str) -> Value {
    json!({ "blocks": [{ "type": "text", "value": text }] })
}

/// Sends the satisfaction survey through the Open API.
#[derive(Debug, Clone)]
pub struct OpenApiSurvey {
    api: OpenApiClient,
}

impl OpenApiSurvey {
    pub const fn new(api: OpenApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SurveySender for OpenApiSurvey {
    async fn send_survey(&self, chat: &Entity) -> Result<(), HookError> {
        self.api.send_message(&chat.id, SURVEY_TEXT).await?;
        info!(chat_id = %chat.id, "Satisfaction survey sent");
        Ok(())
    }
}
