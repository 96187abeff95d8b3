use thiserror::Error;

/// Errors from repository operations (used by trait definitions in gymdesk-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the external messaging gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("missing webhook signature")]
    MissingSignature,

    #[error("webhook signature verification failed")]
    InvalidSignature,

    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("gateway not configured: {0}")]
    Config(String),
}

/// Errors related to chat and read-state operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("storage error: {0}")]
    StorageError(String),

    #[error("gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to training statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("storage error: {0}")]
    StorageError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to staff profile management.
#[derive(Debug, Error)]
pub enum StaffError {
    #[error("staff member not found")]
    NotFound,

    #[error("email '{0}' is already in use")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to staff login sessions.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session expired or unknown")]
    SessionExpired,

    #[error("storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_gateway_rejected_display() {
        let err = GatewayError::Rejected {
            status: 400,
            body: "Invalid reply token".to_string(),
        };
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("Invalid reply token"));
    }

    #[test]
    fn test_chat_error_wraps_gateway_error() {
        let err: ChatError = GatewayError::Transport("connection reset".to_string()).into();
        assert!(matches!(err, ChatError::GatewayError(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_staff_conflict_display() {
        let err = StaffError::Conflict("a@b.jp".to_string());
        assert_eq!(err.to_string(), "email 'a@b.jp' is already in use");
    }
}
