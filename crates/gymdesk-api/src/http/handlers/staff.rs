//! Staff profile updates from the settings page and the JSON API.

use axum::extract::State;
use axum::response::Redirect;
use axum::{Form, Json};

use gymdesk_types::user::{UpdateStaffRequest, User};

use crate::http::error::AppError;
use crate::http::extractors::auth::StaffSession;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// PUT /api/v1/staff/me
pub async fn update_me(
    State(state): State<AppState>,
    StaffSession(staff): StaffSession,
    Json(body): Json<UpdateStaffRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let timer = RequestTimer::start();
    let user = state.staff.update_staff(&staff.id, body).await?;
    Ok(Json(timer.respond(user).with_link("settings", "/settings")))
}

/// POST /settings/profile (form-encoded)
///
/// Redirects back to the settings page on success.
pub async fn update_profile_form(
    State(state): State<AppState>,
    StaffSession(staff): StaffSession,
    Form(form): Form<UpdateStaffRequest>,
) -> Result<Redirect, AppError> {
    state.staff.update_staff(&staff.id, form).await?;
    Ok(Redirect::to("/settings?saved=1"))
}
