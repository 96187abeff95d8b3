//! Training service: record sessions, query extrema, administrative clear.

use chrono::Utc;
use gymdesk_types::error::StatsError;
use gymdesk_types::training::{
    ClearedTraining, ExerciseStats, NewTrainingSet, TrainingLog, TrainingSet,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::repository::training::TrainingRepository;
use crate::training::stats::compute_extrema;

pub struct TrainingService<T: TrainingRepository> {
    training_repo: T,
}

impl<T: TrainingRepository> TrainingService<T> {
    pub fn new(training_repo: T) -> Self {
        Self { training_repo }
    }

    /// Heaviest and lightest set a member logged for an exercise.
    ///
    /// `Ok(None)` means the member has no sets for that exercise.
    pub async fn exercise_stats(
        &self,
        member_id: &str,
        exercise_name: &str,
    ) -> Result<Option<ExerciseStats>, StatsError> {
        let member_id = member_id.trim();
        let exercise_name = exercise_name.trim();
        if member_id.is_empty() || exercise_name.is_empty() {
            return Err(StatsError::InvalidInput(
                "member id and exercise name are required".to_string(),
            ));
        }

        let samples = self
            .training_repo
            .list_samples(member_id, exercise_name)
            .await
            .map_err(|e| {
                error!(member_id = %member_id, exercise = %exercise_name, error = %e, "failed to load sets");
                StatsError::StorageError(e.to_string())
            })?;

        Ok(compute_extrema(&samples))
    }

    /// Exercises a member has logged at least once.
    pub async fn exercise_names(&self, member_id: &str) -> Result<Vec<String>, StatsError> {
        self.training_repo
            .list_exercise_names(member_id.trim())
            .await
            .map_err(|e| StatsError::StorageError(e.to_string()))
    }

    /// Create a training log with its sets.
    pub async fn record_session(
        &self,
        member_id: &str,
        sets: Vec<NewTrainingSet>,
    ) -> Result<(TrainingLog, Vec<TrainingSet>), StatsError> {
        let member_id = member_id.trim();
        if member_id.is_empty() {
            return Err(StatsError::InvalidInput("member id cannot be empty".to_string()));
        }
        if sets.is_empty() {
            return Err(StatsError::InvalidInput(
                "a training session needs at least one set".to_string(),
            ));
        }
        for (i, set) in sets.iter().enumerate() {
            validate_set(set).map_err(|msg| StatsError::InvalidInput(format!("set {}: {msg}", i + 1)))?;
        }

        let now = Utc::now();
        let log = TrainingLog {
            id: Uuid::now_v7(),
            member_id: member_id.to_string(),
            created_at: now,
        };
        let rows: Vec<TrainingSet> = sets
            .into_iter()
            .map(|s| TrainingSet {
                id: Uuid::now_v7(),
                training_log_id: log.id,
                exercise_name: s.exercise_name.trim().to_string(),
                weight: s.weight,
                reps: s.reps,
                created_at: now,
            })
            .collect();

        self.training_repo.create_log(&log, &rows).await.map_err(|e| {
            error!(member_id = %member_id, error = %e, "failed to record training session");
            StatsError::StorageError(e.to_string())
        })?;

        info!(member_id = %member_id, log_id = %log.id, sets = rows.len(), "recorded training session");
        Ok((log, rows))
    }

    /// Delete all training data.
    pub async fn clear_all(&self) -> Result<ClearedTraining, StatsError> {
        let cleared = self
            .training_repo
            .clear_all()
            .await
            .map_err(|e| StatsError::StorageError(e.to_string()))?;
        warn!(sets = cleared.sets, logs = cleared.logs, "cleared all training data");
        Ok(cleared)
    }
}

fn validate_set(set: &NewTrainingSet) -> Result<(), &'static str> {
    if set.exercise_name.trim().is_empty() {
        return Err("exercise name cannot be empty");
    }
    if !set.weight.is_finite() || set.weight < 0.0 {
        return Err("weight must be a non-negative number");
    }
    if set.reps == 0 {
        return Err("reps must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTrainingRepository;

    fn set(exercise: &str, weight: f64, reps: u32) -> NewTrainingSet {
        NewTrainingSet {
            exercise_name: exercise.to_string(),
            weight,
            reps,
        }
    }

    #[tokio::test]
    async fn stats_none_when_no_sets_match() {
        let service = TrainingService::new(FakeTrainingRepository::default());
        service
            .record_session("M", vec![set("Squat", 100.0, 5)])
            .await
            .unwrap();

        assert_eq!(service.exercise_stats("M", "Bench Press").await.unwrap(), None);
        assert_eq!(service.exercise_stats("other", "Squat").await.unwrap(), None);
    }

    #[tokio::test]
    async fn stats_cover_all_sessions_of_the_member() {
        let service = TrainingService::new(FakeTrainingRepository::default());
        service
            .record_session("M", vec![set("Bench Press", 60.0, 10)])
            .await
            .unwrap();
        service
            .record_session("M", vec![set("Bench Press", 80.0, 5), set("Squat", 120.0, 3)])
            .await
            .unwrap();
        service
            .record_session("N", vec![set("Bench Press", 200.0, 1)])
            .await
            .unwrap();

        let stats = service.exercise_stats("M", "Bench Press").await.unwrap().unwrap();
        assert_eq!(stats.max.weight, 80.0);
        assert_eq!(stats.max.reps, 5);
        assert_eq!(stats.min.weight, 60.0);
        assert_eq!(stats.min.reps, 10);
    }

    #[tokio::test]
    async fn member_id_is_trimmed_for_queries_as_for_recording() {
        let service = TrainingService::new(FakeTrainingRepository::default());
        service
            .record_session(" M ", vec![set("Bench Press", 70.0, 8)])
            .await
            .unwrap();

        let stats = service.exercise_stats(" M", "Bench Press ").await.unwrap().unwrap();
        assert_eq!(stats.max.weight, 70.0);
        assert_eq!(service.exercise_names("M ").await.unwrap(), vec!["Bench Press".to_string()]);
    }

    #[tokio::test]
    async fn invalid_sets_are_rejected() {
        let service = TrainingService::new(FakeTrainingRepository::default());
        for bad in [set("", 50.0, 5), set("Row", -1.0, 5), set("Row", f64::NAN, 5), set("Row", 50.0, 0)] {
            let err = service.record_session("M", vec![bad]).await.unwrap_err();
            assert!(matches!(err, StatsError::InvalidInput(_)));
        }
        assert!(matches!(
            service.record_session("M", vec![]).await,
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn blank_query_is_invalid() {
        let service = TrainingService::new(FakeTrainingRepository::default());
        assert!(matches!(
            service.exercise_stats("M", "  ").await,
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn storage_failure_is_an_error_not_none() {
        let repo = FakeTrainingRepository::default();
        repo.set_failing(true);
        let service = TrainingService::new(repo);
        assert!(matches!(
            service.exercise_stats("M", "Bench Press").await,
            Err(StatsError::StorageError(_))
        ));
    }

    #[tokio::test]
    async fn clear_all_removes_everything() {
        let service = TrainingService::new(FakeTrainingRepository::default());
        service
            .record_session("M", vec![set("Deadlift", 140.0, 3), set("Deadlift", 150.0, 1)])
            .await
            .unwrap();

        let cleared = service.clear_all().await.unwrap();
        assert_eq!(cleared, ClearedTraining { sets: 2, logs: 1 });
        assert_eq!(service.exercise_stats("M", "Deadlift").await.unwrap(), None);
    }

    #[tokio::test]
    async fn exercise_names_are_distinct() {
        let service = TrainingService::new(FakeTrainingRepository::default());
        service
            .record_session("M", vec![set("Squat", 100.0, 5), set("Bench Press", 60.0, 8), set("Squat", 105.0, 3)])
            .await
            .unwrap();
        assert_eq!(
            service.exercise_names("M").await.unwrap(),
            vec!["Bench Press".to_string(), "Squat".to_string()]
        );
    }
}
