//! Axum router configuration with middleware.
//!
//! JSON API under `/api/v1/`, staff pages guarded by [`require_session`],
//! login/logout forms, and the LINE webhook.
//! Middleware: session guard, CORS, request tracing.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::guard::require_session;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/sessions", post(handlers::auth::create_session))
        .route("/unread-count", get(handlers::unread::unread_count))
        .route("/conversations", get(handlers::conversation::list_conversations))
        .route(
            "/conversations/{user_id}/messages",
            get(handlers::conversation::get_messages).post(handlers::conversation::send_message),
        )
        .route(
            "/conversations/{user_id}/read",
            post(handlers::conversation::mark_read),
        )
        .route(
            "/members/{member_id}/stats",
            get(handlers::stats::exercise_stats),
        )
        .route(
            "/members/{member_id}/exercises",
            get(handlers::stats::list_exercises),
        )
        .route(
            "/members/{member_id}/training-logs",
            post(handlers::stats::record_session),
        )
        .route("/staff/me", put(handlers::staff::update_me));

    let page_routes = Router::new()
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/dashboard/chat/{user_id}", get(handlers::pages::chat_page))
        .route("/settings", get(handlers::pages::settings))
        .route("/settings/profile", post(handlers::staff::update_profile_form))
        .route(
            "/login",
            get(handlers::pages::login_page).post(handlers::auth::login),
        )
        .route("/logout", post(handlers::auth::logout));

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(page_routes)
        .route("/webhook/line", post(handlers::webhook::line_webhook))
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - no auth required.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
