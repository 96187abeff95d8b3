//! Shared domain types for gymdesk.
//!
//! This crate contains the core domain types used across the gymdesk service:
//! chat messages, training logs and sets, staff/member users, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod training;
pub mod user;
