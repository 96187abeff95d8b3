//! Session guard for staff pages.
//!
//! Requests under a protected prefix need a valid session cookie. Without one
//! the client is redirected to the login page with `?next=` set to the
//! original path. API routes and static assets are never redirected; the API
//! authenticates per handler and answers 401 instead.
//!
//! GET and HEAD get a 307. Any other method gets a 303 so the browser follows
//! up with a GET instead of replaying a form body against the login handler.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use gymdesk_types::config::AuthConfig;
use gymdesk_types::error::AuthError;

use crate::http::error::AppError;
use crate::http::extractors::auth::{CurrentStaff, session_cookie};
use crate::state::AppState;

/// Paths the guard never touches.
fn is_exempt(path: &str) -> bool {
    if path.starts_with("/api/") || path.starts_with("/static/") || path == "/favicon.ico" {
        return true;
    }
    // Anything that looks like a file (`/robots.txt`, `/logo.png`).
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

/// Whether `path` requires a staff session under `auth`.
pub fn requires_session(path: &str, auth: &AuthConfig) -> bool {
    if is_exempt(path) {
        return false;
    }
    auth.protected_prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Login URL that returns to `original` after authenticating.
pub fn login_redirect_target(login_path: &str, original: &str) -> String {
    format!("{login_path}?next={}", utf8_percent_encode(original, NON_ALPHANUMERIC))
}

/// Only same-site absolute paths are accepted as `next` targets.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

/// Redirect to `target`, keeping the method only for GET and HEAD.
fn login_redirect(method: &Method, target: &str) -> Response {
    if method == Method::GET || method == Method::HEAD {
        Redirect::temporary(target).into_response()
    } else {
        Redirect::to(target).into_response()
    }
}

/// Middleware enforcing [`requires_session`].
///
/// On success the authenticated user is stored as a [`CurrentStaff`]
/// request extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !requires_session(&path, &state.config.auth) {
        return next.run(request).await;
    }

    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let method = request.method().clone();
    let redirect = || {
        login_redirect(
            &method,
            &login_redirect_target(&state.config.auth.login_path, &original),
        )
    };

    let Some(token) = session_cookie(request.headers()) else {
        debug!(path = %path, "no session cookie, redirecting to login");
        return redirect();
    };

    match state.auth.authenticate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentStaff(user));
            next.run(request).await
        }
        Err(e @ AuthError::StorageError(_)) => AppError::from(e).into_response(),
        Err(_) => {
            debug!(path = %path, "session rejected, redirecting to login");
            redirect()
        }
    }
}
