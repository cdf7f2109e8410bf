//! Side-Effect Hooks
//!
//! Narrow interfaces to everything outside the callback core: notifications,
//! CRM sync, order lookup, coupon issuance and memo persistence. Every call
//! goes through [`Hooks::bounded`] so an unresponsive collaborator cannot stall
//! a callback past the configured timeout.

pub mod open_api;
pub mod slack;
pub mod stub;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::callbacks::envelope::Entity;

pub use open_api::{OpenApiClient, OpenApiSurvey};
pub use slack::SlackAlerts;
pub use stub::{LoggingHooks, SampleOrders, SequenceCoupons};

/// Default bound on a single hook call.
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Hook errors.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook timed out after {0:?}")]
    Timeout(Duration),
    #[error("hook failed: {0}")]
    Failed(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// One order record, in the order the upstream source returns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub product: String,
    pub status: String,
    pub date: String,
}

/// Alerts raised from chat and message events.
#[async_trait]
pub trait ChatAlerts: Send + Sync {
    /// A customer opened a new chat.
    async fn chat_created(&self, chat: &Entity) -> Result<(), HookError>;

    /// A message matched one of the urgent keywords.
    async fn urgent_message(&self, message: &Entity) -> Result<(), HookError>;
}

/// Satisfaction survey sent when a chat closes.
#[async_trait]
pub trait SurveySender: Send + Sync {
    async fn send_survey(&self, chat: &Entity) -> Result<(), HookError>;
}

/// Customer record sync. Implementations must upsert so redelivery is harmless.
#[async_trait]
pub trait CustomerSync: Send + Sync {
    async fn sync_user(&self, user: &Entity) -> Result<(), HookError>;
}

/// Order history lookup.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, HookError>;
}

/// Coupon issuance. Every call must yield a fresh code.
#[async_trait]
pub trait CouponIssuer: Send + Sync {
    async fn issue_coupon(&self, user_id: &str) -> Result<String, HookError>;
}

/// Memo persistence.
#[async_trait]
pub trait MemoStore: Send + Sync {
    async fn save_memo(&self, user_id: &str, memo: &str) -> Result<(), HookError>;
}

/// The full set of collaborators the callback handlers call into.
#[derive(Clone)]
pub struct Hooks {
    pub alerts: Arc<dyn ChatAlerts>,
    pub surveys: Arc<dyn SurveySender>,
    pub customers: Arc<dyn CustomerSync>,
    pub orders: Arc<dyn OrderLookup>,
    pub coupons: Arc<dyn CouponIssuer>,
    pub memos: Arc<dyn MemoStore>,
    /// Bound applied to every hook call.
    pub timeout: Duration,
}

impl Hooks {
    /// Hooks that only log, plus sample orders and sequence coupons.
    #[must_use]
    pub fn logging() -> Self {
        let log = Arc::new(LoggingHooks);
        Self {
            alerts: log.clone(),
            surveys: log.clone(),
            customers: log.clone(),
            orders: Arc::new(SampleOrders),
            coupons: Arc::new(SequenceCoupons::default()),
            memos: log,
            timeout: DEFAULT_HOOK_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run a hook call under the configured timeout.
    ///
    /// On expiry the call's future is dropped, cancelling any in-flight work.
    pub async fn bounded<T, F>(&self, hook: &'static str, call: F) -> Result<T, HookError>
    where
        F: Future<Output = Result<T, HookError>> + Send,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(hook, timeout = ?self.timeout, "Hook call timed out");
                Err(HookError::Timeout(self.timeout))
            }
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
