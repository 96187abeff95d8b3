//! SQLite training log repository.

use gymdesk_core::repository::training::TrainingRepository;
use gymdesk_types::error::RepositoryError;
use gymdesk_types::training::{ClearedTraining, SetSample, TrainingLog, TrainingSet};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteTrainingRepository {
    pool: DatabasePool,
}

impl SqliteTrainingRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl TrainingRepository for SqliteTrainingRepository {
    async fn create_log(&self, log: &TrainingLog, sets: &[TrainingSet]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("INSERT INTO training_logs (id, member_id, created_at) VALUES (?, ?, ?)")
            .bind(log.id.to_string())
            .bind(&log.member_id)
            .bind(format_datetime(&log.created_at))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        for set in sets {
            sqlx::query(
                "INSERT INTO training_sets (id, training_log_id, exercise_name, weight, reps, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(set.id.to_string())
            .bind(set.training_log_id.to_string())
            .bind(&set.exercise_name)
            .bind(set.weight)
            .bind(i64::from(set.reps))
            .bind(format_datetime(&set.created_at))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;
        Ok(())
    }

    async fn list_samples(
        &self,
        member_id: &str,
        exercise_name: &str,
    ) -> Result<Vec<SetSample>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT s.weight, s.reps, s.created_at
               FROM training_sets s
               JOIN training_logs l ON l.id = s.training_log_id
               WHERE l.member_id = ?1 AND s.exercise_name = ?2
               ORDER BY s.created_at ASC, s.id ASC"#,
        )
        .bind(member_id)
        .bind(exercise_name)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                let reps: i64 = row.try_get("reps").map_err(query_error)?;
                let created_at: String = row.try_get("created_at").map_err(query_error)?;
                Ok(SetSample {
                    weight: row.try_get("weight").map_err(query_error)?,
                    reps: u32::try_from(reps)
                        .map_err(|_| RepositoryError::Query(format!("invalid reps value: {reps}")))?,
                    created_at: parse_datetime(&created_at)?,
                })
            })
            .collect()
    }

    async fn list_exercise_names(&self, member_id: &str) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"SELECT DISTINCT s.exercise_name
               FROM training_sets s
               JOIN training_logs l ON l.id = s.training_log_id
               WHERE l.member_id = ?
               ORDER BY s.exercise_name"#,
        )
        .bind(member_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn clear_all(&self) -> Result<ClearedTraining, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let sets = sqlx::query("DELETE FROM training_sets")
            .execute(&mut *tx)
            .await
            .map_err(query_error)?
            .rows_affected();
        let logs = sqlx::query("DELETE FROM training_logs")
            .execute(&mut *tx)
            .await
            .map_err(query_error)?
            .rows_affected();

        tx.commit().await.map_err(query_error)?;
        Ok(ClearedTraining { sets, logs })
    }
}
