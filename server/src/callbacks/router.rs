//! Event Routing
//!
//! Maps an envelope's event kind to its handler. Unknown kinds are logged and
//! acknowledged. Handler failures are logged with the event kind and entity id
//! and returned as a generic [`CallbackError::Handler`].

use tracing::{debug, error, info};

use super::envelope::{Entity, Envelope};
use super::error::{CallbackError, CallbackResult};
use crate::hooks::{HookError, Hooks};

/// Event kinds the router has a handler for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A customer opened a new chat.
    UserChatCreated,
    /// A chat was (re)opened by a manager.
    UserChatOpened,
    /// A chat was closed.
    UserChatClosed,
    /// A message was posted in a chat.
    MessageCreated,
    /// A new customer record was created.
    UserCreated,
    /// A customer record changed.
    UserUpdated,
}

impl EventKind {
    /// Parse from the dotted wire form (e.g., `"user_chat.created"`).
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "user_chat.created" => Some(Self::UserChatCreated),
            "user_chat.opened" => Some(Self::UserChatOpened),
            "user_chat.closed" => Some(Self::UserChatClosed),
            "message.created" => Some(Self::MessageCreated),
            "user.created" => Some(Self::UserCreated),
            "user.updated" => Some(Self::UserUpdated),
            _ => None,
        }
    }

    /// Convert to the dotted wire form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserChatCreated => "user_chat.created",
            Self::UserChatOpened => "user_chat.opened",
            Self::UserChatClosed => "user_chat.closed",
            Self::MessageCreated => "message.created",
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the router did with an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A handler ran to completion.
    Handled(EventKind),
    /// Unknown kind, acknowledged without side effects.
    Ignored,
}

/// Routes envelopes to their handlers.
#[derive(Debug, Clone)]
pub struct EventRouter {
    hooks: Hooks,
    urgent_keywords: Vec<String>,
}

impl EventRouter {
    pub const fn new(hooks: Hooks, urgent_keywords: Vec<String>) -> Self {
        Self {
            hooks,
            urgent_keywords,
        }
    }

    /// Dispatch a single envelope.
    pub async fn dispatch(&self, envelope: &Envelope) -> CallbackResult<Dispatched> {
        let Some(kind) = EventKind::parse_str(&envelope.event) else {
            debug!(event_kind = %envelope.event, entity_id = %envelope.entity.id, "Unhandled event");
            return Ok(Dispatched::Ignored);
        };

        debug!(event_kind = %kind, entity_id = %envelope.entity.id, "Webhook received");

        match self.handle(kind, &envelope.entity).await {
            Ok(()) => Ok(Dispatched::Handled(kind)),
            Err(e) => {
                error!(
                    event_kind = %kind,
                    entity_id = %envelope.entity.id,
                    error = %e,
                    "Webhook handler failed"
                );
                Err(CallbackError::Handler(e))
            }
        }
    }

    /// Dispatch every envelope of a delivery.
    ///
    /// A failing envelope does not stop the ones after it; the delivery as a
    /// whole fails if any of them did.
    pub async fn dispatch_all(&self, envelopes: &[Envelope]) -> CallbackResult<Vec<Dispatched>> {
        let mut outcomes = Vec::with_capacity(envelopes.len());
        let mut last_error = None;
        let mut failed = 0;

        for envelope in envelopes {
            match self.dispatch(envelope).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            None => Ok(outcomes),
            Some(e) if envelopes.len() == 1 => Err(e),
            Some(_) => Err(CallbackError::Batch {
                failed,
                total: envelopes.len(),
            }),
        }
    }

    async fn handle(&self, kind: EventKind, entity: &Entity) -> Result<(), HookError> {
        let hooks = &self.hooks;
        match kind {
            EventKind::UserChatCreated => {
                hooks
                    .bounded("chat_created", hooks.alerts.chat_created(entity))
                    .await
            }
            EventKind::UserChatOpened => {
                info!(chat_id = %entity.id, "Chat opened");
                Ok(())
            }
            EventKind::UserChatClosed => {
                hooks
                    .bounded("send_survey", hooks.surveys.send_survey(entity))
                    .await
            }
            EventKind::MessageCreated => {
                if self.is_urgent(entity) {
                    hooks
                        .bounded("urgent_message", hooks.alerts.urgent_message(entity))
                        .await
                } else {
                    debug!(message_id = %entity.id, "New message");
                    Ok(())
                }
            }
            EventKind::UserCreated | EventKind::UserUpdated => {
                hooks
                    .bounded("sync_user", hooks.customers.sync_user(entity))
                    .await
            }
        }
    }

    fn is_urgent(&self, message: &Entity) -> bool {
        let Some(text) = message.str_field("plainText") else {
            return false;
        };
        let text = text.to_lowercase();
        self.urgent_keywords
            .iter()
            .any(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
    }
}
