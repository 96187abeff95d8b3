//! Infrastructure layer for gymdesk.
//!
//! Contains implementations of the ports defined in `gymdesk-core`: SQLite
//! storage, the LINE Messaging API client and webhook verification, password
//! and session-token credentials, configuration loading, and the HTTP unread
//! source used by remote badge pollers.

pub mod config;
pub mod crypto;
pub mod line;
pub mod remote;
pub mod sqlite;
