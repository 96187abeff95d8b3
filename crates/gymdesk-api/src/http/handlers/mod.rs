//! HTTP request handlers.

pub mod auth;
pub mod conversation;
pub mod pages;
pub mod staff;
pub mod stats;
pub mod unread;
pub mod webhook;
