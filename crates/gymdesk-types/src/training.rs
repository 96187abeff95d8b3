//! Training log, set, and extrema statistics types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A training session container for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLog {
    pub id: Uuid,
    pub member_id: String,
    pub created_at: DateTime<Utc>,
}

/// A single logged set. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    pub id: Uuid,
    pub training_log_id: Uuid,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub created_at: DateTime<Utc>,
}

/// Input for one set when recording a training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrainingSet {
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
}

/// The projection of a set used for extrema statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSample {
    pub weight: f64,
    pub reps: u32,
    pub created_at: DateTime<Utc>,
}

/// One end of the weight range for a member/exercise pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatPoint {
    pub weight: f64,
    pub reps: u32,
    /// Calendar date in `YYYY/M/D` form (Japan Standard Time).
    pub date: String,
}

/// Heaviest and lightest logged set for a member/exercise pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub max: StatPoint,
    pub min: StatPoint,
}

/// Row counts removed by the administrative data-clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedTraining {
    pub sets: u64,
    pub logs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_stats_serializes_with_max_and_min() {
        let stats = ExerciseStats {
            max: StatPoint {
                weight: 80.0,
                reps: 5,
                date: "2024/5/3".to_string(),
            },
            min: StatPoint {
                weight: 60.0,
                reps: 10,
                date: "2024/5/1".to_string(),
            },
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["max"]["weight"], 80.0);
        assert_eq!(json["min"]["reps"], 10);
        assert_eq!(json["max"]["date"], "2024/5/3");
    }
}
