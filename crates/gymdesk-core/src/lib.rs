//! Business logic and repository trait definitions for gymdesk.
//!
//! This crate defines the "ports" (repository, gateway, and credential traits)
//! that the infrastructure layer implements. It depends only on
//! `gymdesk-types` -- never on `gymdesk-infra` or any database/IO crate.

pub mod chat;
pub mod gateway;
pub mod repository;
pub mod service;
pub mod training;

#[cfg(test)]
pub(crate) mod testing;
