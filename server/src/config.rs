//! Server Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::callbacks::signing::MissingSecretPolicy;
use crate::hooks::open_api::DEFAULT_API_URL;

/// Messenger languages supported by the client SDK.
pub const LANGUAGES: &[&str] = &["ko", "en", "ja"];

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Webhook signing secret
    pub webhook_secret: Option<String>,

    /// Snippet signing token
    pub snippet_token: Option<String>,

    /// Accept unsigned snippet requests when no token is configured
    pub snippet_allow_unsigned: bool,

    /// Plugin key handed to the client SDK
    pub plugin_key: Option<String>,

    /// Messenger language (one of [`LANGUAGES`])
    pub language: String,

    /// Hide the default messenger button on boot
    pub hide_default_button: bool,

    /// Messenger z-index override
    pub z_index: Option<i64>,

    /// Secret for member hashes returned by the boot endpoint
    pub member_hash_secret: Option<String>,

    /// Open API access key
    pub access_key: Option<String>,

    /// Open API access secret
    pub access_secret: Option<String>,

    /// Open API base URL
    pub api_url: String,

    /// Slack incoming webhook for chat alerts
    pub slack_webhook_url: Option<String>,

    /// Keywords that mark a message as urgent
    pub urgent_keywords: Vec<String>,

    /// Bound on each side-effect hook call (default: 30s)
    pub hook_timeout: Duration,

    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let language = env::var("CHANNEL_TALK_LANGUAGE").unwrap_or_else(|_| "ko".into());
        if !LANGUAGES.contains(&language.as_str()) {
            bail!("CHANNEL_TALK_LANGUAGE must be one of {LANGUAGES:?}, got {language:?}");
        }

        let z_index = non_empty("CHANNEL_TALK_Z_INDEX")
            .map(|v| v.parse())
            .transpose()
            .context("CHANNEL_TALK_Z_INDEX must be an integer")?;

        let config = Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            webhook_secret: non_empty("CHANNEL_TALK_SECRET"),
            snippet_token: non_empty("CHANNEL_TALK_SNIPPET_TOKEN"),
            snippet_allow_unsigned: flag("SNIPPET_ALLOW_UNSIGNED"),
            plugin_key: non_empty("CHANNEL_TALK_PLUGIN_KEY"),
            language,
            hide_default_button: flag("CHANNEL_TALK_HIDE_DEFAULT_BUTTON"),
            z_index,
            member_hash_secret: non_empty("CHANNEL_TALK_MEMBER_HASH_SECRET"),
            access_key: non_empty("CHANNEL_TALK_ACCESS_KEY"),
            access_secret: non_empty("CHANNEL_TALK_ACCESS_SECRET"),
            api_url: non_empty("CHANNEL_TALK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            slack_webhook_url: non_empty("SLACK_WEBHOOK_URL"),
            urgent_keywords: parse_keywords(
                &env::var("URGENT_KEYWORDS").unwrap_or_else(|_| "긴급,urgent".into()),
            ),
            hook_timeout: Duration::from_secs(
                env::var("HOOK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
        };

        if config.webhook_secret.is_none() {
            warn!("CHANNEL_TALK_SECRET is not set, all webhooks will be rejected");
        }
        if config.snippet_token.is_none() {
            if config.snippet_allow_unsigned {
                warn!("CHANNEL_TALK_SNIPPET_TOKEN is not set, accepting unsigned snippet requests");
            } else {
                warn!("CHANNEL_TALK_SNIPPET_TOKEN is not set, all snippet requests will be rejected");
            }
        }

        Ok(config)
    }

    /// Policy for the snippet endpoint when no token is configured.
    #[must_use]
    pub const fn snippet_missing_secret_policy(&self) -> MissingSecretPolicy {
        if self.snippet_allow_unsigned {
            MissingSecretPolicy::Allow
        } else {
            MissingSecretPolicy::Reject
        }
    }

    /// Open API access key and secret, when both are configured.
    #[must_use]
    pub fn open_api_credentials(&self) -> Option<(&str, &str)> {
        self.access_key.as_deref().zip(self.access_secret.as_deref())
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            webhook_secret: Some("test-webhook-secret".into()),
            snippet_token: Some("test-snippet-token".into()),
            snippet_allow_unsigned: false,
            plugin_key: Some("test-plugin-key".into()),
            language: "ko".into(),
            hide_default_button: false,
            z_index: None,
            member_hash_secret: Some("test-member-secret".into()),
            access_key: None,
            access_secret: None,
            api_url: DEFAULT_API_URL.into(),
            slack_webhook_url: None,
            urgent_keywords: vec!["긴급".into(), "urgent".into()],
            hook_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024,
        }
    }
}

fn redact(secret: Option<&String>) -> &'static str {
    if secret.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("webhook_secret", &redact(self.webhook_secret.as_ref()))
            .field("snippet_token", &redact(self.snippet_token.as_ref()))
            .field("snippet_allow_unsigned", &self.snippet_allow_unsigned)
            .field("plugin_key", &self.plugin_key)
            .field("language", &self.language)
            .field("hide_default_button", &self.hide_default_button)
            .field("z_index", &self.z_index)
            .field("member_hash_secret", &redact(self.member_hash_secret.as_ref()))
            .field("access_key", &redact(self.access_key.as_ref()))
            .field("access_secret", &redact(self.access_secret.as_ref()))
            .field("api_url", &self.api_url)
            .field("slack_webhook_url", &redact(self.slack_webhook_url.as_ref()))
            .field("urgent_keywords", &self.urgent_keywords)
            .field("hook_timeout", &self.hook_timeout)
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}
