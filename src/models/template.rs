use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Exercise;

/// Trainer-authored reusable plan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingTemplate {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateDay {
    pub id: Uuid,
    pub template_id: Uuid,
    pub day_number: i32,
    pub day_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateDay {
    pub day_number: i32,
    pub day_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateDayExercise {
    pub id: Uuid,
    pub template_day_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: i32,
    pub reps: String,
    pub rest_seconds: i32,
    pub notes: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateDayExerciseDetail {
    #[serde(flatten)]
    pub entry: TemplateDayExercise,
    pub exercise: Exercise,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateDayWithExercises {
    #[serde(flatten)]
    pub day: TemplateDay,
    pub exercises: Vec<TemplateDayExerciseDetail>,
}

/// Fully expanded template: days ascending by day_number, each day's
/// exercises ascending by order_index.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateComplete {
    #[serde(flatten)]
    pub template: TrainingTemplate,
    pub days: Vec<TemplateDayWithExercises>,
}

/// Record of a trainer assigning a template to a student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateAssignment {
    pub id: Uuid,
    pub template_id: Uuid,
    pub student_id: Uuid,
    pub trainer_id: Uuid,
    pub notes: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AssignTemplateRequest {
    pub template_id: Uuid,
    pub student_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentWithTemplate {
    #[serde(flatten)]
    pub assignment: TemplateAssignment,
    pub template: TrainingTemplate,
}
