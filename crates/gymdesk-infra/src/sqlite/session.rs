//! SQLite session store.

use gymdesk_core::repository::session::{SessionRecord, SessionRepository};
use gymdesk_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Remove sessions that expired before now. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        let now = format_datetime(&chrono::Utc::now());
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &SessionRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id.to_string())
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.expires_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn get(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT token_hash, user_id, created_at, expires_at FROM sessions WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let user_id: String = row.try_get("user_id").map_err(query_error)?;
        let created_at: String = row.try_get("created_at").map_err(query_error)?;
        let expires_at: String = row.try_get("expires_at").map_err(query_error)?;
        Ok(Some(SessionRecord {
            token_hash: row.try_get("token_hash").map_err(query_error)?,
            user_id: parse_uuid(&user_id)?,
            created_at: parse_datetime(&created_at)?,
            expires_at: parse_datetime(&expires_at)?,
        }))
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}
