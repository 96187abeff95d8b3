//! Staff session extractor.
//!
//! Accepts the session token from:
//! - the `gymdesk_session` cookie (browser)
//! - `Authorization: Bearer <token>` (CLI and scripts)
//!
//! Only the token's SHA-256 digest is looked up in the `sessions` table.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use gymdesk_types::error::AuthError;
use gymdesk_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "gymdesk_session";

/// User resolved by the page guard, stored as a request extension.
#[derive(Debug, Clone)]
pub struct CurrentStaff(pub User);

/// An authenticated staff member. Rejects with 401.
#[derive(Debug, Clone)]
pub struct StaffSession(pub User);

impl FromRequestParts<AppState> for StaffSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(CurrentStaff(user)) = parts.extensions.get::<CurrentStaff>() {
            return Ok(StaffSession(user.clone()));
        }

        let token = session_token(&parts.headers).ok_or_else(|| {
            AppError::Unauthorized(
                "Missing session. Log in or provide 'Authorization: Bearer <token>'.".to_string(),
            )
        })?;

        match state.auth.authenticate(&token).await {
            Ok(user) => Ok(StaffSession(user)),
            Err(e @ AuthError::StorageError(_)) => Err(e.into()),
            Err(_) => Err(AppError::Unauthorized("Session expired or invalid".to_string())),
        }
    }
}

/// Token from the bearer header, falling back to the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| session_cookie(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Value of the session cookie, if present.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value that stores `token` for `max_age_secs`.
pub fn session_set_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that clears the session cookie.
pub fn session_clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("a=1; gymdesk_session=abc123; b=2"));
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("gymdesk_session=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn empty_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("gymdesk_session="));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn set_cookie_attributes() {
        let cookie = session_set_cookie("tok", 3600);
        assert!(cookie.starts_with("gymdesk_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(session_clear_cookie().contains("Max-Age=0"));
    }
}
