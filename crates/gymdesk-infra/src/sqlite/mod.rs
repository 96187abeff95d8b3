//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod chat;
pub mod pool;
pub mod session;
pub mod training;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};
use gymdesk_types::error::RepositoryError;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Shared column helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    s.parse::<Uuid>()
        .map_err(|e| RepositoryError::Query(format!("invalid UUID: {e}")))
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::pool::DatabasePool;
    use tempfile::TempDir;

    /// Fresh migrated database. Keep the `TempDir` alive for the whole test.
    pub async fn test_pool() -> (DatabasePool, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (pool, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formatted_datetimes_sort_chronologically() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(500);
        let c = a + chrono::Duration::microseconds(1);
        let (fa, fb, fc) = (format_datetime(&a), format_datetime(&b), format_datetime(&c));
        assert!(fa < fc && fc < fb);
        assert_eq!(parse_datetime(&fb).unwrap(), b);
    }

    #[tokio::test]
    async fn test_pool_database_is_removed_with_its_dir() {
        let (pool, dir) = test_support::test_pool().await;
        let db_path = dir.path().join("test.db");
        assert!(db_path.exists());

        pool.writer.close().await;
        pool.reader.close().await;
        drop(dir);
        assert!(!db_path.exists());
    }
}
