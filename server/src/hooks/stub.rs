//! Default Hook Implementations
//!
//! Used when no real collaborator is configured. They log the call and
//! return canned data so both endpoints stay fully functional.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    ChatAlerts, CouponIssuer, CustomerSync, HookError, MemoStore, Order, OrderLookup,
    SurveySender,
};
use crate::callbacks::envelope::Entity;

/// Logs every notification and persistence call and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHooks;

#[async_trait]
impl ChatAlerts for LoggingHooks {
    async fn chat_created(&self, chat: &Entity) -> Result<(), HookError> {
        info!(chat_id = %chat.id, "New chat created");
        Ok(())
    }

    async fn urgent_message(&self, message: &Entity) -> Result<(), HookError> {
        info!(message_id = %message.id, "Urgent message received");
        Ok(())
    }
}

#[async_trait]
impl SurveySender for LoggingHooks {
    async fn send_survey(&self, chat: &Entity) -> Result<(), HookError> {
        info!(chat_id = %chat.id, "Satisfaction survey requested");
        Ok(())
    }
}

#[async_trait]
impl CustomerSync for LoggingHooks {
    async fn sync_user(&self, user: &Entity) -> Result<(), HookError> {
        info!(user_id = %user.id, "Customer sync requested");
        Ok(())
    }
}

#[async_trait]
impl MemoStore for LoggingHooks {
    async fn save_memo(&self, user_id: &str, memo: &str) -> Result<(), HookError> {
        info!(user_id, memo_len = memo.len(), "Memo saved");
        debug!(user_id, memo, "Memo content");
        Ok(())
    }
}

/// Fixed order history, returned for every user.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOrders;

#[async_trait]
impl OrderLookup for SampleOrders {
    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, HookError> {
        debug!(user_id, "Returning sample orders");
        Ok(vec![
            Order {
                id: "ORD-2024-001".into(),
                product: "프리미엄 플랜".into(),
                status: "이용중".into(),
                date: "2024-01-15".into(),
            },
            Order {
                id: "ORD-2024-002".into(),
                product: "추가 시트 5개".into(),
                status: "완료".into(),
                date: "2024-01-20".into(),
            },
        ])
    }
}

/// Issues `WELCOME-<token>` codes from a strictly increasing millisecond token.
///
/// The token is `max(now_ms, last + 1)`, so two calls never share a code even
/// within the same millisecond.
#[derive(Debug, Default)]
pub struct SequenceCoupons {
    last: AtomicU64,
}

impl SequenceCoupons {
    fn next_token(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

#[async_trait]
impl CouponIssuer for SequenceCoupons {
    async fn issue_coupon(&self, user_id: &str) -> Result<String, HookError> {
        let code = format!("WELCOME-{}", to_base36(self.next_token()));
        info!(user_id, code = %code, "Coupon issued");
        Ok(code)
    }
}

/// Uppercase base-36 rendering.
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
