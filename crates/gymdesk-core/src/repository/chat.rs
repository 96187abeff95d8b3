//! Chat message repository trait definition.

use gymdesk_types::chat::{ChatMessage, ConversationSummary};
use gymdesk_types::error::RepositoryError;

/// Repository trait for member conversation persistence.
///
/// Implementations live in gymdesk-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Persist a new message (inbound or outbound).
    ///
    /// Returns `false` without storing anything when a message with the same
    /// `external_id` already exists.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Get messages for a conversation, ordered by created_at ASC.
    ///
    /// When `limit` is set, the most recent `limit` messages are returned
    /// (still in ascending order).
    fn list_messages(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Count USER-sent messages with `is_read = false` across all conversations.
    fn count_unread_inbound(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Set `is_read = true` on every unread USER message in a conversation.
    ///
    /// Returns the number of rows updated.
    fn mark_inbound_read(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Unread counts per conversation, most recent unread first.
    ///
    /// Only conversations with at least one unread USER message are included.
    fn unread_by_conversation(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationSummary>, RepositoryError>> + Send;
}
