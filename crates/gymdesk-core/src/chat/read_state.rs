//! Read-state service: unread counts and mark-as-read.
//!
//! Storage failures are logged here and returned as `ChatError::StorageError`
//! so callers can tell an empty inbox from a failed query.

use gymdesk_types::chat::ConversationSummary;
use gymdesk_types::error::ChatError;
use tracing::{debug, error};

use crate::chat::poller::UnreadSource;
use crate::repository::chat::ChatRepository;

/// Counts and clears unread inbound messages.
pub struct ReadStateService<R: ChatRepository> {
    chat_repo: R,
}

impl<R: ChatRepository> ReadStateService<R> {
    pub fn new(chat_repo: R) -> Self {
        Self { chat_repo }
    }

    /// Number of USER messages not yet read, across all conversations.
    pub async fn global_unread_count(&self) -> Result<u64, ChatError> {
        self.chat_repo.count_unread_inbound().await.map_err(|e| {
            error!(error = %e, "failed to count unread messages");
            ChatError::StorageError(e.to_string())
        })
    }

    /// Mark every unread USER message in a conversation as read.
    ///
    /// Returns how many messages changed state. Zero is a success.
    pub async fn mark_messages_as_read(&self, user_id: &str) -> Result<u64, ChatError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ChatError::InvalidInput("user id cannot be empty".to_string()));
        }

        let updated = self.chat_repo.mark_inbound_read(user_id).await.map_err(|e| {
            error!(user_id = %user_id, error = %e, "failed to mark messages as read");
            ChatError::StorageError(e.to_string())
        })?;

        debug!(user_id = %user_id, updated, "marked conversation read");
        Ok(updated)
    }

    /// Conversations with unread messages, most recent first.
    pub async fn unread_by_conversation(&self) -> Result<Vec<ConversationSummary>, ChatError> {
        self.chat_repo.unread_by_conversation().await.map_err(|e| {
            error!(error = %e, "failed to list unread conversations");
            ChatError::StorageError(e.to_string())
        })
    }
}

impl<R: ChatRepository> UnreadSource for ReadStateService<R> {
    async fn fetch_unread_count(&self) -> Result<u64, ChatError> {
        self.global_unread_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeChatRepository;
    use gymdesk_types::chat::ChatMessage;

    #[tokio::test]
    async fn counts_only_unread_user_messages() {
        let repo = FakeChatRepository::default();
        repo.push(ChatMessage::inbound("U1", "hi"));
        repo.push(ChatMessage::inbound("U1", "are you open today?"));
        repo.push(ChatMessage::outbound("U1", "yes, until 22:00"));
        let mut read = ChatMessage::inbound("U2", "thanks");
        read.is_read = true;
        repo.push(read);

        let service = ReadStateService::new(repo);
        assert_eq!(service.global_unread_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn mark_read_clears_one_conversation_only() {
        let repo = FakeChatRepository::default();
        for text in ["a", "b", "c"] {
            repo.push(ChatMessage::inbound("U", text));
        }
        repo.push(ChatMessage::inbound("V", "other"));

        let service = ReadStateService::new(repo);
        assert_eq!(service.global_unread_count().await.unwrap(), 4);

        let updated = service.mark_messages_as_read("U").await.unwrap();
        assert_eq!(updated, 3);
        assert_eq!(service.global_unread_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn three_unread_then_zero_after_mark() {
        let repo = FakeChatRepository::default();
        for text in ["a", "b", "c"] {
            repo.push(ChatMessage::inbound("U", text));
        }
        let service = ReadStateService::new(repo);

        assert_eq!(service.global_unread_count().await.unwrap(), 3);
        service.mark_messages_as_read("U").await.unwrap();
        assert_eq!(service.global_unread_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn marking_an_empty_conversation_succeeds() {
        let service = ReadStateService::new(FakeChatRepository::default());
        assert_eq!(service.mark_messages_as_read("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn blank_user_id_is_rejected() {
        let service = ReadStateService::new(FakeChatRepository::default());
        let err = service.mark_messages_as_read("  ").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn storage_failure_is_distinguishable_from_zero() {
        let repo = FakeChatRepository::default();
        repo.set_failing(true);
        let service = ReadStateService::new(repo);

        let err = service.global_unread_count().await.unwrap_err();
        assert!(matches!(err, ChatError::StorageError(_)));
        let err = service.mark_messages_as_read("U").await.unwrap_err();
        assert!(matches!(err, ChatError::StorageError(_)));
    }

    #[tokio::test]
    async fn mark_read_never_reverts() {
        let repo = FakeChatRepository::default();
        repo.push(ChatMessage::inbound("U", "first"));
        let service = ReadStateService::new(repo);

        service.mark_messages_as_read("U").await.unwrap();
        service.mark_messages_as_read("U").await.unwrap();
        assert_eq!(service.global_unread_count().await.unwrap(), 0);
    }
}
