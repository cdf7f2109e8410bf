//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router, and
//! `RecordingHooks`, a hook double that records every call it receives.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ct_callbacks::api::{create_router, AppState};
use ct_callbacks::callbacks::envelope::Entity;
use ct_callbacks::callbacks::signing::{sign_payload, SIGNATURE_HEADER};
use ct_callbacks::config::Config;
use ct_callbacks::hooks::{
    ChatAlerts, CouponIssuer, CustomerSync, HookError, Hooks, MemoStore, Order, OrderLookup,
    SurveySender,
};

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ChatCreated(String),
    UrgentMessage(String),
    Survey(String),
    SyncUser(String),
    Orders(String),
    Coupon(String),
    Memo(String, String),
}

/// Hook double that records calls and can be told to fail or stall.
#[derive(Default)]
pub struct RecordingHooks {
    calls: Mutex<Vec<Call>>,
    entities: Mutex<Vec<Entity>>,
    orders: Vec<Order>,
    fail_on: Option<&'static str>,
    stall: Option<Duration>,
    coupons: std::sync::atomic::AtomicU64,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    /// Fail every call to the named hook.
    pub fn failing(mut self, hook: &'static str) -> Self {
        self.fail_on = Some(hook);
        self
    }

    /// Sleep this long inside every call.
    pub fn stalling(mut self, delay: Duration) -> Self {
        self.stall = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.entities.lock().unwrap().clone()
    }

    async fn record(&self, hook: &'static str, call: Call) -> Result<(), HookError> {
        if let Some(delay) = self.stall {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(hook) {
            return Err(HookError::Failed(format!("{hook} failed")));
        }
        Ok(())
    }

    async fn record_entity(
        &self,
        hook: &'static str,
        entity: &Entity,
        call: Call,
    ) -> Result<(), HookError> {
        self.entities.lock().unwrap().push(entity.clone());
        self.record(hook, call).await
    }

    /// Bundle into `Hooks` with every slot pointing at this recorder.
    pub fn into_hooks(self: &Arc<Self>, timeout: Duration) -> Hooks {
        Hooks {
            alerts: self.clone(),
            surveys: self.clone(),
            customers: self.clone(),
            orders: self.clone(),
            coupons: self.clone(),
            memos: self.clone(),
            timeout,
        }
    }
}

#[async_trait]
impl ChatAlerts for RecordingHooks {
    async fn chat_created(&self, chat: &Entity) -> Result<(), HookError> {
        self.record_entity("chat_created", chat, Call::ChatCreated(chat.id.clone()))
            .await
    }

    async fn urgent_message(&self, message: &Entity) -> Result<(), HookError> {
        self.record_entity(
            "urgent_message",
            message,
            Call::UrgentMessage(message.id.clone()),
        )
        .await
    }
}

#[async_trait]
impl SurveySender for RecordingHooks {
    async fn send_survey(&self, chat: &Entity) -> Result<(), HookError> {
        self.record_entity("send_survey", chat, Call::Survey(chat.id.clone()))
            .await
    }
}

#[async_trait]
impl CustomerSync for RecordingHooks {
    async fn sync_user(&self, user: &Entity) -> Result<(), HookError> {
        self.record_entity("sync_user", user, Call::SyncUser(user.id.clone()))
            .await
    }
}

#[async_trait]
impl OrderLookup for RecordingHooks {
    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, HookError> {
        self.record("orders_for_user", Call::Orders(user_id.to_string()))
            .await?;
        Ok(self.orders.clone())
    }
}

#[async_trait]
impl CouponIssuer for RecordingHooks {
    async fn issue_coupon(&self, user_id: &str) -> Result<String, HookError> {
        self.record("issue_coupon", Call::Coupon(user_id.to_string()))
            .await?;
        let n = self
            .coupons
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(format!("TEST-{n}"))
    }
}

#[async_trait]
impl MemoStore for RecordingHooks {
    async fn save_memo(&self, user_id: &str, memo: &str) -> Result<(), HookError> {
        self.record(
            "save_memo",
            Call::Memo(user_id.to_string(), memo.to_string()),
        )
        .await
    }
}

/// Router plus the recorder behind it.
pub struct TestApp {
    pub router: Router,
    pub config: Config,
    pub hooks: Arc<RecordingHooks>,
}

impl TestApp {
    /// App with test config and a fresh recorder.
    pub fn new() -> Self {
        Self::with(Config::default_for_test(), RecordingHooks::new())
    }

    pub fn with(config: Config, hooks: RecordingHooks) -> Self {
        let hooks = Arc::new(hooks);
        let state = AppState::new(config.clone(), hooks.into_hooks(config.hook_timeout));
        Self {
            router: create_router(state),
            config,
            hooks,
        }
    }

    /// Send a request through the router.
    pub async fn oneshot(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }

    /// POST a raw body with an optional signature header.
    pub async fn post(&self, path: &str, body: &[u8], signature: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", "application/json");
        if let Some(sig) = signature {
            builder = builder.header(SIGNATURE_HEADER, sig);
        }
        self.oneshot(builder.body(Body::from(body.to_vec())).unwrap())
            .await
    }

    /// POST a webhook body signed with the configured secret.
    pub async fn post_webhook(&self, body: &[u8]) -> Response<Body> {
        let sig = sign_payload(self.config.webhook_secret.as_deref().unwrap(), body);
        self.post("/api/channel-talk/webhook", body, Some(&sig))
            .await
    }

    /// POST a snippet body signed with the configured token.
    pub async fn post_snippet(&self, body: &[u8]) -> Response<Body> {
        let sig = sign_payload(self.config.snippet_token.as_deref().unwrap(), body);
        self.post("/api/channel-talk/snippet", body, Some(&sig))
            .await
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Response<Body> {
        self.oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Collect a response body as JSON.
pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(resp: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(resp.status(), status);
    body_json(resp).await
}
