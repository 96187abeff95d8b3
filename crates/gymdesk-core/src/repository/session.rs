//! Staff login session repository trait definition.

use chrono::{DateTime, Utc};
use gymdesk_types::error::RepositoryError;
use uuid::Uuid;

/// A persisted login session. Only the token digest is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Repository trait for staff sessions.
pub trait SessionRepository: Send + Sync {
    fn create(
        &self,
        session: &SessionRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<SessionRecord>, RepositoryError>> + Send;

    /// Delete a session. Returns `true` if it existed.
    fn delete(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
