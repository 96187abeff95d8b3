//! Login and logout.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use gymdesk_types::error::AuthError;
use gymdesk_types::user::User;

use crate::http::error::AppError;
use crate::http::extractors::auth::{
    session_clear_cookie, session_set_cookie, session_token,
};
use crate::http::guard::safe_next;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// POST /login (form)
///
/// Sets the session cookie and redirects to `next` (or the dashboard). Bad
/// credentials redirect back to the login page.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let login_path = &state.config.auth.login_path;
    match state.auth.login(&form.email, &form.password).await {
        Ok(session) => {
            let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
            let target = safe_next(form.next.as_deref()).unwrap_or("/dashboard");
            Ok((
                [(SET_COOKIE, session_set_cookie(&session.token, max_age))],
                Redirect::to(target),
            )
                .into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            Ok(Redirect::to(&format!("{login_path}?error=invalid")).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/v1/sessions (JSON)
///
/// Token-returning login for the CLI and scripts.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let timer = RequestTimer::start();
    let session = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(timer.respond(SessionView {
        token: session.token,
        expires_at: session.expires_at,
        user: session.user,
    })))
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.auth.logout(&token).await {
            warn!(error = %e, "failed to delete session on logout");
        }
    }
    (
        [(SET_COOKIE, session_clear_cookie())],
        Redirect::to(&state.config.auth.login_path),
    )
        .into_response()
}
