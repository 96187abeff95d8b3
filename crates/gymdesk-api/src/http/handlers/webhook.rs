//! LINE webhook receiver.
//!
//! Verifies `x-line-signature` against the raw body before anything is
//! parsed, then stores user text messages as unread.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;
use tracing::warn;

use gymdesk_infra::line::webhook::SIGNATURE_HEADER;
use gymdesk_types::error::GatewayError;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookReceipt {
    pub received: usize,
}

/// POST /webhook/line
pub async fn line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<WebhookReceipt>>, AppError> {
    let timer = RequestTimer::start();
    let verifier = state.webhook.as_ref().ok_or_else(|| {
        GatewayError::Config("LINE_CHANNEL_SECRET is not set".to_string())
    })?;

    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let texts = verifier.verify_and_parse(&body, signature).inspect_err(|e| {
        warn!(error = %e, "rejected webhook delivery");
    })?;

    let received = state.conversations.record_inbound(&texts).await?;
    Ok(Json(timer.respond(WebhookReceipt { received })))
}
