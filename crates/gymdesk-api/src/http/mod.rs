//! HTTP layer for gymdesk.
//!
//! JSON API under `/api/v1/`, session-guarded staff pages, the LINE webhook
//! receiver, and the login/logout form endpoints.

pub mod error;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod response;
pub mod router;
