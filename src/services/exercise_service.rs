use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Exercise, ExerciseScope, NewExercise, UpdateExercise};

const EXERCISE_COLUMNS: &str = "id, name, description, muscle_group, difficulty, instructions, \
     video_url, image_url, scope, owner_id, created_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ExerciseService {
    db: PgPool,
}

impl ExerciseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The exercises a user may pick from: global ones, their trainer's
    /// ones and their own personal ones, sorted by name. A NULL trainer
    /// makes the trainer disjunct match nothing.
    pub async fn available_for(
        &self,
        user_id: Uuid,
        trainer_id: Option<Uuid>,
    ) -> Result<Vec<Exercise>> {
        let sql = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises
             WHERE scope = 'global'
                OR (scope = 'trainer' AND owner_id = $2)
                OR (scope = 'personal' AND owner_id = $1)
             ORDER BY name"
        );

        let exercises = sqlx::query_as::<_, Exercise>(&sql)
            .bind(user_id)
            .bind(trainer_id)
            .fetch_all(&self.db)
            .await?;

        Ok(exercises)
    }

    /// Full library, unscoped (admin view)
    pub async fn list_all(&self) -> Result<Vec<Exercise>> {
        let sql = format!("SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY name");

        let exercises = sqlx::query_as::<_, Exercise>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(exercises)
    }

    /// Create a global exercise (admin)
    pub async fn create_global(&self, created_by: Uuid, data: NewExercise) -> Result<Exercise> {
        self.insert(ExerciseScope::Global, None, created_by, data).await
    }

    /// Create a trainer-scoped exercise, visible to that trainer's students
    pub async fn create_trainer_exercise(
        &self,
        trainer_id: Uuid,
        data: NewExercise,
    ) -> Result<Exercise> {
        self.insert(ExerciseScope::Trainer, Some(trainer_id), trainer_id, data)
            .await
    }

    /// Create a personal exercise, visible only to its owner
    pub async fn create_personal_exercise(
        &self,
        user_id: Uuid,
        data: NewExercise,
    ) -> Result<Exercise> {
        self.insert(ExerciseScope::Personal, Some(user_id), user_id, data)
            .await
    }

    async fn insert(
        &self,
        scope: ExerciseScope,
        owner_id: Option<Uuid>,
        created_by: Uuid,
        data: NewExercise,
    ) -> Result<Exercise> {
        let sql = format!(
            "INSERT INTO exercises
                (name, description, muscle_group, difficulty, instructions,
                 video_url, image_url, scope, owner_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {EXERCISE_COLUMNS}"
        );

        let exercise = sqlx::query_as::<_, Exercise>(&sql)
            .bind(&data.name)
            .bind(&data.description)
            .bind(&data.muscle_group)
            .bind(&data.difficulty)
            .bind(&data.instructions)
            .bind(&data.video_url)
            .bind(&data.image_url)
            .bind(scope)
            .bind(owner_id)
            .bind(created_by)
            .fetch_one(&self.db)
            .await?;

        Ok(exercise)
    }

    /// Partial update of a global library entry (admin)
    pub async fn update(&self, id: Uuid, data: UpdateExercise) -> Result<Option<Exercise>> {
        let sql = format!(
            "UPDATE exercises
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 muscle_group = COALESCE($4, muscle_group),
                 difficulty = COALESCE($5, difficulty),
                 instructions = COALESCE($6, instructions),
                 video_url = COALESCE($7, video_url),
                 image_url = COALESCE($8, image_url),
                 updated_at = $9
             WHERE id = $1
             RETURNING {EXERCISE_COLUMNS}"
        );

        let exercise = sqlx::query_as::<_, Exercise>(&sql)
            .bind(id)
            .bind(&data.name)
            .bind(&data.description)
            .bind(&data.muscle_group)
            .bind(&data.difficulty)
            .bind(&data.instructions)
            .bind(&data.video_url)
            .bind(&data.image_url)
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?;

        Ok(exercise)
    }

    /// Delete a library entry (admin)
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
