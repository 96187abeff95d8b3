//! Conversation service: inbound webhook messages, staff replies, history.
//!
//! Outbound replies go through the injected [`MessagingGateway`]; a reply is
//! persisted only after the gateway accepted it, so the stored history never
//! shows a message the member did not receive.

use gymdesk_types::chat::{ChatMessage, InboundText};
use gymdesk_types::error::ChatError;
use tracing::{debug, error, info, warn};

use crate::gateway::MessagingGateway;
use crate::repository::chat::ChatRepository;

/// Maximum text length accepted by the messaging platform for one message.
pub const MAX_MESSAGE_CHARS: usize = 5_000;

/// Default number of messages returned by [`ConversationService::history`].
pub const DEFAULT_HISTORY_LIMIT: i64 = 200;

pub struct ConversationService<R: ChatRepository, G: MessagingGateway> {
    chat_repo: R,
    gateway: G,
}

impl<R: ChatRepository, G: MessagingGateway> ConversationService<R, G> {
    pub fn new(chat_repo: R, gateway: G) -> Self {
        Self { chat_repo, gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Persist text messages received through the webhook as unread.
    ///
    /// Returns the number of messages stored. Redelivered events (same event
    /// id) are skipped and not counted. Stops at the first storage failure;
    /// earlier messages in the batch stay stored.
    pub async fn record_inbound(&self, events: &[InboundText]) -> Result<usize, ChatError> {
        let mut stored = 0;
        for event in events {
            if event.sender_id.trim().is_empty() {
                warn!("skipping inbound message without sender id");
                continue;
            }
            let mut message = ChatMessage::inbound(event.sender_id.clone(), event.text.clone());
            message.created_at = event.received_at;
            message.external_id = event.event_id.clone();

            let inserted = self.chat_repo.save_message(&message).await.map_err(|e| {
                error!(user_id = %event.sender_id, error = %e, "failed to store inbound message");
                ChatError::StorageError(e.to_string())
            })?;
            if inserted {
                stored += 1;
            } else {
                debug!(event_id = ?event.event_id, "skipping redelivered inbound message");
            }
        }

        if stored > 0 {
            info!(stored, "recorded inbound messages");
        }
        Ok(stored)
    }

    /// Push a staff reply to the member and store it.
    pub async fn send_staff_message(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<ChatMessage, ChatError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ChatError::InvalidInput("user id cannot be empty".to_string()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::InvalidInput("message text cannot be empty".to_string()));
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ChatError::InvalidInput(format!(
                "message text exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }

        if let Err(e) = self.gateway.push_text(user_id, text).await {
            error!(user_id = %user_id, error = %e, "push message failed");
            return Err(ChatError::GatewayError(e));
        }

        let message = ChatMessage::outbound(user_id, text);
        self.chat_repo.save_message(&message).await.map_err(|e| {
            // The member already has the message; only the local copy is missing.
            error!(user_id = %user_id, error = %e, "pushed message could not be stored");
            ChatError::StorageError(e.to_string())
        })?;

        Ok(message)
    }

    /// Conversation history, oldest first.
    pub async fn history(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 1_000);
        self.chat_repo
            .list_messages(user_id, Some(limit))
            .await
            .map_err(|e| {
                error!(user_id = %user_id, error = %e, "failed to load conversation");
                ChatError::StorageError(e.to_string())
            })
    }
}
