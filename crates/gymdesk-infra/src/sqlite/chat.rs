//! SQLite chat message repository.

use gymdesk_core::repository::chat::ChatRepository;
use gymdesk_types::chat::{ChatMessage, ConversationSummary, MessageSender};
use gymdesk_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: String,
    user_id: String,
    sender: String,
    text: String,
    is_read: bool,
    created_at: String,
    external_id: Option<String>,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
            external_id: row.try_get("external_id")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sender: MessageSender = self
            .sender
            .parse()
            .map_err(RepositoryError::Query)?;
        Ok(ChatMessage {
            id: parse_uuid(&self.id)?,
            user_id: self.user_id,
            sender,
            text: self.text,
            is_read: self.is_read,
            created_at: parse_datetime(&self.created_at)?,
            external_id: self.external_id,
        })
    }
}

fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// ChatRepository impl
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn save_message(&self, message: &ChatMessage) -> Result<bool, RepositoryError> {
        // NULL external ids never conflict, so outbound messages always insert.
        let result = sqlx::query(
            r#"INSERT INTO chat_messages (id, user_id, sender, text, is_read, created_at, external_id)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(external_id) DO NOTHING"#,
        )
        .bind(message.id.to_string())
        .bind(&message.user_id)
        .bind(message.sender.as_str())
        .bind(&message.text)
        .bind(message.is_read)
        .bind(format_datetime(&message.created_at))
        .bind(message.external_id.as_deref())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_messages(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // Newest N, returned oldest first. LIMIT -1 means unbounded in SQLite.
        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT id, user_id, sender, text, is_read, created_at, external_id
                   FROM chat_messages
                   WHERE user_id = ?1
                   ORDER BY created_at DESC, id DESC
                   LIMIT ?2
               )
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(user_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                ChatMessageRow::from_row(row)
                    .map_err(query_error)?
                    .into_message()
            })
            .collect()
    }

    async fn count_unread_inbound(&self) -> Result<u64, RepositoryError> {
        let (n,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM chat_messages WHERE sender = 'USER' AND is_read = 0",
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_error)?;
        Ok(count(n))
    }

    async fn mark_inbound_read(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chat_messages SET is_read = 1
               WHERE user_id = ?1 AND sender = 'USER' AND is_read = 0"#,
        )
        .bind(user_id)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(result.rows_affected())
    }

    async fn unread_by_conversation(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT m.user_id AS user_id,
                      COUNT(*) AS unread_count,
                      MAX(m.created_at) AS last_message_at,
                      (SELECT u.name FROM users u
                        WHERE u.line_user_id = m.user_id OR u.id = m.user_id
                        LIMIT 1) AS display_name
               FROM chat_messages m
               WHERE m.sender = 'USER' AND m.is_read = 0
               GROUP BY m.user_id
               ORDER BY last_message_at DESC"#,
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                let last: String = row.try_get("last_message_at").map_err(query_error)?;
                let unread: i64 = row.try_get("unread_count").map_err(query_error)?;
                Ok(ConversationSummary {
                    user_id: row.try_get("user_id").map_err(query_error)?,
                    display_name: row.try_get("display_name").map_err(query_error)?,
                    unread_count: count(unread),
                    last_message_at: parse_datetime(&last)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use chrono::{TimeZone, Utc};

    fn inbound_at(user: &str, text: &str, minute: u32) -> ChatMessage {
        let mut m = ChatMessage::inbound(user, text);
        m.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap();
        m
    }

    #[tokio::test]
    async fn unread_count_covers_only_unread_inbound() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        repo.save_message(&inbound_at("U1", "a", 0)).await.unwrap();
        repo.save_message(&inbound_at("U1", "b", 1)).await.unwrap();
        repo.save_message(&inbound_at("U2", "c", 2)).await.unwrap();
        repo.save_message(&ChatMessage::outbound("U1", "reply")).await.unwrap();

        assert_eq!(repo.count_unread_inbound().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_external_id_is_not_stored_twice() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        let mut first = inbound_at("U1", "Can I book Friday?", 0);
        first.external_id = Some("ev-1".to_string());
        let mut again = inbound_at("U1", "Can I book Friday?", 0);
        again.external_id = Some("ev-1".to_string());

        assert!(repo.save_message(&first).await.unwrap());
        assert!(!repo.save_message(&again).await.unwrap());
        // Messages without an external id never collide.
        assert!(repo.save_message(&ChatMessage::outbound("U1", "yes")).await.unwrap());
        assert!(repo.save_message(&ChatMessage::outbound("U1", "yes")).await.unwrap());

        let stored = repo.list_messages("U1", None).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].external_id.as_deref(), Some("ev-1"));
        assert_eq!(repo.count_unread_inbound().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_read_is_scoped_and_idempotent() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        repo.save_message(&inbound_at("U1", "a", 0)).await.unwrap();
        repo.save_message(&inbound_at("U1", "b", 1)).await.unwrap();
        repo.save_message(&inbound_at("U2", "c", 2)).await.unwrap();

        assert_eq!(repo.mark_inbound_read("U1").await.unwrap(), 2);
        assert_eq!(repo.mark_inbound_read("U1").await.unwrap(), 0);
        assert_eq!(repo.count_unread_inbound().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_messages_returns_latest_window_oldest_first() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        for (i, text) in ["one", "two", "three"].iter().enumerate() {
            repo.save_message(&inbound_at("U1", text, i as u32)).await.unwrap();
        }
        repo.save_message(&inbound_at("U2", "other", 5)).await.unwrap();

        let all = repo.list_messages("U1", None).await.unwrap();
        assert_eq!(all.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(), ["one", "two", "three"]);

        let last_two = repo.list_messages("U1", Some(2)).await.unwrap();
        assert_eq!(last_two.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(), ["two", "three"]);
        assert!(last_two.iter().all(|m| m.sender == MessageSender::User && !m.is_read));
    }

    #[tokio::test]
    async fn conversations_are_ordered_by_latest_unread() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());
        repo.save_message(&inbound_at("U1", "a", 0)).await.unwrap();
        repo.save_message(&inbound_at("U2", "b", 1)).await.unwrap();
        repo.save_message(&inbound_at("U2", "c", 3)).await.unwrap();

        sqlx::query(
            "INSERT INTO users (id, name, email, unit_price, line_user_id, role, created_at, updated_at)
             VALUES ('m1', 'Tanaka', 'tanaka@example.com', 0, 'U2', 'MEMBER', ?1, ?1)",
        )
        .bind(format_datetime(&Utc::now()))
        .execute(&pool.writer)
        .await
        .unwrap();

        let summaries = repo.unread_by_conversation().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].user_id, "U2");
        assert_eq!(summaries[0].unread_count, 2);
        assert_eq!(summaries[0].display_name.as_deref(), Some("Tanaka"));
        assert_eq!(
            summaries[0].last_message_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 3, 0).unwrap()
        );
        assert_eq!(summaries[1].display_name, None);

        repo.mark_inbound_read("U2").await.unwrap();
        let summaries = repo.unread_by_conversation().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].user_id, "U1");
    }
}
