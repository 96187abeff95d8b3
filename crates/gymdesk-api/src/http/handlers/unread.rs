//! Unread badge endpoint polled by the dashboard.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use gymdesk_core::chat::badge::badge_label;

use crate::http::error::AppError;
use crate::http::extractors::auth::StaffSession;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCountView {
    pub count: u64,
    /// Rendered badge; `null` when there is nothing to show.
    pub badge: Option<String>,
}

/// GET /api/v1/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<ApiResponse<UnreadCountView>>, AppError> {
    let timer = RequestTimer::start();
    let count = state.read_state.global_unread_count().await?;

    Ok(Json(
        timer
            .respond(UnreadCountView {
                count,
                badge: badge_label(count),
            })
            .with_link("conversations", "/api/v1/conversations"),
    ))
}
