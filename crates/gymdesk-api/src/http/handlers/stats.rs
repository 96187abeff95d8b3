//! Member training endpoints: extrema stats, exercise list, session logging.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use gymdesk_types::training::{ExerciseStats, NewTrainingSet, TrainingLog, TrainingSet};

use crate::http::error::AppError;
use crate::http::extractors::auth::StaffSession;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub exercise: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordSessionRequest {
    pub sets: Vec<NewTrainingSet>,
}

#[derive(Debug, Serialize)]
pub struct RecordedSession {
    pub log: TrainingLog,
    pub sets: Vec<TrainingSet>,
}

/// GET /api/v1/members/{member_id}/stats?exercise=
///
/// `data` is `null` when the member has no sets for the exercise.
pub async fn exercise_stats(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(member_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<Option<ExerciseStats>>>, AppError> {
    let timer = RequestTimer::start();
    let stats = state
        .training
        .exercise_stats(&member_id, &query.exercise)
        .await?;
    Ok(Json(timer.respond(stats)))
}

/// GET /api/v1/members/{member_id}/exercises
pub async fn list_exercises(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(member_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let timer = RequestTimer::start();
    let names = state.training.exercise_names(&member_id).await?;
    Ok(Json(timer.respond(names)))
}

/// POST /api/v1/members/{member_id}/training-logs
pub async fn record_session(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(member_id): Path<String>,
    Json(body): Json<RecordSessionRequest>,
) -> Result<Json<ApiResponse<RecordedSession>>, AppError> {
    let timer = RequestTimer::start();
    let (log, sets) = state.training.record_session(&member_id, body.sets).await?;
    Ok(Json(
        timer
            .respond(RecordedSession { log, sets })
            .with_link("exercises", format!("/api/v1/members/{member_id}/exercises")),
    ))
}
