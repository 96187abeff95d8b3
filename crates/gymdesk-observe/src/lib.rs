//! Observability setup shared by the gymdesk binary.

pub mod tracing_setup;
