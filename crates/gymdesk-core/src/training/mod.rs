//! Training logs and per-exercise extrema statistics.

pub mod service;
pub mod stats;
