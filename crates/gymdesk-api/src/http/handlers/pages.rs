//! Staff pages behind the session guard.
//!
//! Pages return the same JSON envelope as the API; presentation is left to
//! the client. The login page is the one HTML response.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use serde::{Deserialize, Serialize};

use gymdesk_core::chat::badge::badge_label;
use gymdesk_types::chat::{ChatMessage, ConversationSummary};
use gymdesk_types::user::User;

use crate::http::error::AppError;
use crate::http::extractors::auth::StaffSession;
use crate::http::guard::safe_next;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub staff_name: String,
    pub unread_count: u64,
    pub badge: Option<String>,
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Serialize)]
pub struct ChatPageView {
    pub user_id: String,
    /// Messages that opening this page marked as read.
    pub marked_read: u64,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
    pub error: Option<String>,
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    StaffSession(staff): StaffSession,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    let timer = RequestTimer::start();
    let unread_count = state.read_state.global_unread_count().await?;
    let conversations = state.read_state.unread_by_conversation().await?;

    Ok(Json(
        timer
            .respond(DashboardView {
                staff_name: staff.name,
                unread_count,
                badge: badge_label(unread_count),
                conversations,
            })
            .with_link("unread_count", "/api/v1/unread-count"),
    ))
}

/// GET /dashboard/chat/{user_id}
///
/// Opening a conversation marks its inbound messages as read.
pub async fn chat_page(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<ChatPageView>>, AppError> {
    let timer = RequestTimer::start();
    let marked_read = state.read_state.mark_messages_as_read(&user_id).await?;
    let messages = state.conversations.history(&user_id, None).await?;

    Ok(Json(
        timer
            .respond(ChatPageView {
                user_id: user_id.clone(),
                marked_read,
                messages,
            })
            .with_link("send", format!("/api/v1/conversations/{user_id}/messages")),
    ))
}

/// GET /settings
pub async fn settings(StaffSession(staff): StaffSession) -> Json<ApiResponse<User>> {
    let timer = RequestTimer::start();
    Json(timer.respond(staff).with_link("update", "/settings/profile"))
}

/// GET /login
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let next = safe_next(query.next.as_deref()).unwrap_or("/dashboard");
    let notice = if query.error.is_some() {
        "<p class=\"error\">Invalid email or password.</p>"
    } else {
        ""
    };

    Html(format!(
        r#"<!doctype html>
<html lang="ja">
<head><meta charset="utf-8"><title>gymdesk login</title></head>
<body>
<h1>Staff login</h1>
{notice}
<form method="post" action="/login">
<input type="hidden" name="next" value="{next}">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
</body>
</html>"#,
        next = escape_attr(next),
    ))
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_page_keeps_local_next_only() {
        let Html(body) = login_page(Query(LoginPageQuery {
            next: Some("/dashboard/chat/U1".to_string()),
            error: None,
        }))
        .await;
        assert!(body.contains(r#"value="/dashboard/chat/U1""#));
        assert!(!body.contains("Invalid email"));

        let Html(body) = login_page(Query(LoginPageQuery {
            next: Some("https://evil.example".to_string()),
            error: Some("invalid".to_string()),
        }))
        .await;
        assert!(body.contains(r#"value="/dashboard""#));
        assert!(body.contains("Invalid email"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(escape_attr(r#"/a"><script>"#), "/a&quot;&gt;&lt;script&gt;");
    }
}
