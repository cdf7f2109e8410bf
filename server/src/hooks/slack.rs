//! Slack Chat Alerts
//!
//! Posts chat alerts to a Slack incoming webhook.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use super::{ChatAlerts, HookError};
use crate::callbacks::envelope::Entity;

/// Slack incoming-webhook notifier.
#[derive(Debug, Clone)]
pub struct SlackAlerts {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackAlerts {
    pub fn new(client: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }

    async fn post(&self, text: String) -> Result<(), HookError> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Slack webhook rejected alert");
            return Err(HookError::Failed(format!("Slack returned HTTP {status}")));
        }
        debug!("Slack alert delivered");
        Ok(())
    }
}

/// Text for a new-chat alert.
pub(crate) fn chat_created_text(chat: &Entity) -> String {
    format!("새 상담이 시작되었습니다. 채팅 ID: {}", chat.id)
}

/// Text for an urgent-message alert.
pub(crate) fn urgent_message_text(message: &Entity) -> String {
    let chat = message.str_field("chatId").unwrap_or("-");
    let text = message.str_field("plainText").unwrap_or_default();
    format!("긴급 메시지가 도착했습니다. 채팅 ID: {chat}\n> {text}")
}

#[async_trait]
impl ChatAlerts for SlackAlerts {
    async fn chat_created(&self, chat: &Entity) -> Result<(), HookError> {
        self.post(chat_created_text(chat)).await
    }

    async fn urgent_message(&self, message: &Entity) -> Result<(), HookError> {
        self.post(urgent_message_text(message)).await
    }
}
