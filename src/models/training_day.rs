use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Exercise;

/// One ordered workout day belonging to a user. `template_id`/`assigned_by`
/// record where an assigned day was copied from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingDay {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day_number: i32,
    pub day_name: String,
    pub description: Option<String>,
    pub template_id: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTrainingDay {
    pub day_number: i32,
    pub day_name: String,
    pub description: Option<String>,
}

/// TrainingDay-Exercise join row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DayExercise {
    pub id: Uuid,
    pub training_day_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: i32,
    pub reps: String,
    pub rest_seconds: i32,
    pub notes: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

fn default_sets() -> i32 {
    3
}

fn default_reps() -> String {
    "10-12".to_string()
}

fn default_rest_seconds() -> i32 {
    60
}

#[derive(Debug, Deserialize)]
pub struct AddDayExercise {
    pub exercise_id: Uuid,
    #[serde(default = "default_sets")]
    pub sets: i32,
    #[serde(default = "default_reps")]
    pub reps: String,
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: i32,
    #[serde(default)]
    pub order_index: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExerciseOrder {
    pub order_index: i32,
}

/// Join row embedding the exercise detail
#[derive(Debug, Clone, Serialize)]
pub struct DayExerciseDetail {
    #[serde(flatten)]
    pub entry: DayExercise,
    pub exercise: Exercise,
}

/// A day with its ordered exercise list. A day without exercises carries an
/// empty list, it is never omitted.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingDayWithExercises {
    #[serde(flatten)]
    pub day: TrainingDay,
    pub exercises: Vec<DayExerciseDetail>,
}
