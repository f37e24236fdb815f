use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{Exercise, TrainingDay};

/// One timed, logged performance of a training day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub training_day_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i32>,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub training_day_id: Uuid,
}

/// The recorder supplies the start time it observed; the duration is
/// derived from it rather than from the stored row.
#[derive(Debug, Deserialize)]
pub struct FinishSessionRequest {
    pub start_time: DateTime<Utc>,
}

/// One completed set within a session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub training_session_id: Uuid,
    pub day_exercise_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub set_number: i32,
    pub weight_kg: Option<f64>,
    pub reps: Option<i32>,
    pub completed: bool,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LogSetRequest {
    pub day_exercise_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub set_number: i32,
    pub weight_kg: Option<f64>,
    pub reps: Option<i32>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

/// Session history entry embedding the originating day (if it still exists)
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSessionWithDay {
    #[serde(flatten)]
    pub session: TrainingSession,
    pub training_day: Option<TrainingDay>,
}

/// Logged set embedding its exercise (if it still exists)
#[derive(Debug, Clone, Serialize)]
pub struct SessionSetDetail {
    #[serde(flatten)]
    pub set: ExerciseSet,
    pub exercise: Option<Exercise>,
}
