//! Chat message and conversation types for gymdesk.
//!
//! A conversation is keyed by the member's messaging-platform user id. Inbound
//! messages (from the member) arrive unread; staff messages are stored read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a chat message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('USER', 'STAFF'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageSender {
    /// The gym member, writing in through the messaging platform.
    User,
    /// A staff member replying from the dashboard.
    Staff,
}

impl MessageSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSender::User => "USER",
            MessageSender::Staff => "STAFF",
        }
    }
}

impl fmt::Display for MessageSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageSender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(MessageSender::User),
            "STAFF" => Ok(MessageSender::Staff),
            other => Err(format!("invalid message sender: '{other}'")),
        }
    }
}

/// A single message within a member conversation.
///
/// `is_read` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    /// Conversation key (the member's messaging-platform user id).
    pub user_id: String,
    pub sender: MessageSender,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Platform event id of an inbound message. Redeliveries carry the same id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl ChatMessage {
    /// A message received from a member, not yet read by staff.
    pub fn inbound(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            sender: MessageSender::User,
            text: text.into(),
            is_read: false,
            created_at: Utc::now(),
            external_id: None,
        }
    }

    /// A message sent by staff. Staff messages never count as unread.
    pub fn outbound(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            sender: MessageSender::Staff,
            text: text.into(),
            is_read: true,
            created_at: Utc::now(),
            external_id: None,
        }
    }
}

/// Per-conversation unread summary for the dashboard conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub user_id: String,
    /// Display name of the linked member, if the conversation maps to a known user.
    pub display_name: Option<String>,
    pub unread_count: u64,
    pub last_message_at: DateTime<Utc>,
}

/// A text message received through the messaging platform webhook.
///
/// Gateway-agnostic: the infra layer parses platform payloads into this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundText {
    pub sender_id: String,
    pub text: String,
    /// Platform event time.
    pub received_at: DateTime<Utc>,
    /// Stable id of the delivering event, used to drop redeliveries.
    #[serde(default)]
    pub event_id: Option<String>,
}
