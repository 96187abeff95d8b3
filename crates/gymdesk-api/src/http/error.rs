//! Application error type mapping domain errors to HTTP status codes and the
//! envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use gymdesk_types::error::{AuthError, ChatError, GatewayError, StaffError, StatsError};

use crate::http::response::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
    Gateway(GatewayError),
    Stats(StatsError),
    Staff(StaffError),
    Auth(AuthError),
    Unauthorized(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::GatewayError(g) => AppError::Gateway(g),
            other => AppError::Chat(other),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError::Gateway(e)
    }
}

impl From<StatsError> for AppError {
    fn from(e: StatsError) -> Self {
        AppError::Stats(e)
    }
}

impl From<StaffError> for AppError {
    fn from(e: StaffError) -> Self {
        AppError::Staff(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl AppError {
    /// Status, machine code and message for this error.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::InvalidInput(msg))
            | AppError::Stats(StatsError::InvalidInput(msg))
            | AppError::Staff(StaffError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::StorageError(msg))
            | AppError::Stats(StatsError::StorageError(msg))
            | AppError::Staff(StaffError::StorageError(msg))
            | AppError::Auth(AuthError::StorageError(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::GatewayError(e)) | AppError::Gateway(e) => gateway_parts(e),
            AppError::Staff(StaffError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Staff member not found".to_string())
            }
            AppError::Staff(e @ StaffError::Conflict(_)) => {
                (StatusCode::CONFLICT, "CONFLICT", e.to_string())
            }
            AppError::Auth(e) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        }
    }
}

fn gateway_parts(e: &GatewayError) -> (StatusCode, &'static str, String) {
    match e {
        GatewayError::MissingSignature | GatewayError::InvalidSignature => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
        }
        GatewayError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
        GatewayError::Config(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "GATEWAY_NOT_CONFIGURED",
            e.to_string(),
        ),
        GatewayError::Transport(_) | GatewayError::Rejected { .. } => {
            (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR", e.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            error!(code, error = %message, "request failed");
        }

        let body = ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0);
        (status, axum::Json(body)).into_response()
    }
}
