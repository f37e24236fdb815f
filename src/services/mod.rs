// Business logic services

pub mod exercise_service;
pub mod profile_service;
pub mod trainer_service;
pub mod training_service;

pub use exercise_service::ExerciseService;
pub use profile_service::ProfileService;
pub use trainer_service::TrainerService;
pub use training_service::TrainingService;

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::models::Exercise;

/// Aliased exercise columns for join-fetch queries. Every embed query
/// selects the exercise under `e_`-prefixed names to keep them apart from
/// the join row's own columns.
pub(crate) const EXERCISE_PREFIXED_COLUMNS: &str = "e.id AS e_id, e.name AS e_name, \
     e.description AS e_description, e.muscle_group AS e_muscle_group, \
     e.difficulty AS e_difficulty, e.instructions AS e_instructions, \
     e.video_url AS e_video_url, e.image_url AS e_image_url, e.scope AS e_scope, \
     e.owner_id AS e_owner_id, e.created_by AS e_created_by, \
     e.created_at AS e_created_at, e.updated_at AS e_updated_at";

pub(crate) fn exercise_from_prefixed_row(row: &PgRow) -> Result<Exercise, sqlx::Error> {
    Ok(Exercise {
        id: row.try_get("e_id")?,
        name: row.try_get("e_name")?,
        description: row.try_get("e_description")?,
        muscle_group: row.try_get("e_muscle_group")?,
        difficulty: row.try_get("e_difficulty")?,
        instructions: row.try_get("e_instructions")?,
        video_url: row.try_get("e_video_url")?,
        image_url: row.try_get("e_image_url")?,
        scope: row.try_get("e_scope")?,
        owner_id: row.try_get("e_owner_id")?,
        created_by: row.try_get("e_created_by")?,
        created_at: row.try_get("e_created_at")?,
        updated_at: row.try_get("e_updated_at")?,
    })
}

/// LEFT JOIN variant: the exercise may have been deleted since the row
/// referencing it was written.
pub(crate) fn optional_exercise_from_prefixed_row(
    row: &PgRow,
) -> Result<Option<Exercise>, sqlx::Error> {
    let id: Option<uuid::Uuid> = row.try_get("e_id")?;
    match id {
        Some(_) => Ok(Some(exercise_from_prefixed_row(row)?)),
        None => Ok(None),
    }
}
