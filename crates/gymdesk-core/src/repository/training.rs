//! Training log repository trait definition.

use gymdesk_types::error::RepositoryError;
use gymdesk_types::training::{ClearedTraining, SetSample, TrainingLog, TrainingSet};

/// Repository trait for training logs and their sets.
pub trait TrainingRepository: Send + Sync {
    /// Insert a log and all of its sets atomically.
    fn create_log(
        &self,
        log: &TrainingLog,
        sets: &[TrainingSet],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load `{weight, reps, created_at}` for every set a member logged for an
    /// exercise, joined through the owning log.
    ///
    /// Ordered by `created_at ASC, id ASC` so reductions over the result are
    /// deterministic.
    fn list_samples(
        &self,
        member_id: &str,
        exercise_name: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SetSample>, RepositoryError>> + Send;

    /// Distinct exercise names a member has logged, alphabetical.
    fn list_exercise_names(
        &self,
        member_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Delete every set and log (administrative data-clear).
    fn clear_all(
        &self,
    ) -> impl std::future::Future<Output = Result<ClearedTraining, RepositoryError>> + Send;
}
