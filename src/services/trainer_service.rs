use anyhow::Result;
use chrono::Utc;
use futures::future::try_join_all;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    AddDayExercise, AssignmentWithTemplate, CreateTemplate, CreateTemplateDay,
    TemplateAssignment, TemplateComplete, TemplateDay, TemplateDayExercise,
    TemplateDayExerciseDetail, TemplateDayWithExercises, TrainingTemplate, UpdateTemplate,
};
use crate::services::{exercise_from_prefixed_row, EXERCISE_PREFIXED_COLUMNS};

const TEMPLATE_COLUMNS: &str =
    "id, trainer_id, name, description, is_public, created_at, updated_at";

const TEMPLATE_DAY_COLUMNS: &str =
    "id, template_id, day_number, day_name, description, created_at, updated_at";

const ASSIGNMENT_COLUMNS: &str =
    "id, template_id, student_id, trainer_id, notes, assigned_at";

#[derive(Debug, Clone)]
pub struct TrainerService {
    db: PgPool,
}

impl TrainerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_template(
        &self,
        trainer_id: Uuid,
        data: CreateTemplate,
    ) -> Result<TrainingTemplate> {
        let sql = format!(
            "INSERT INTO training_templates (trainer_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {TEMPLATE_COLUMNS}"
        );

        let template = sqlx::query_as::<_, TrainingTemplate>(&sql)
            .bind(trainer_id)
            .bind(&data.name)
            .bind(&data.description)
            .fetch_one(&self.db)
            .await?;

        Ok(template)
    }

    /// A trainer's templates, newest first
    pub async fn trainer_templates(&self, trainer_id: Uuid) -> Result<Vec<TrainingTemplate>> {
        let sql = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM training_templates
             WHERE trainer_id = $1
             ORDER BY created_at DESC"
        );

        let templates = sqlx::query_as::<_, TrainingTemplate>(&sql)
            .bind(trainer_id)
            .fetch_all(&self.db)
            .await?;

        Ok(templates)
    }

    pub async fn get_template(&self, template_id: Uuid) -> Result<Option<TrainingTemplate>> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM training_templates WHERE id = $1");

        let template = sqlx::query_as::<_, TrainingTemplate>(&sql)
            .bind(template_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(template)
    }

    /// Fully expanded template: days ascending by day_number, each day's
    /// exercises ascending by order_index. Same concurrent per-day
    /// sub-fetch shape as the personal-day read; all-or-nothing.
    pub async fn template_complete(&self, template_id: Uuid) -> Result<Option<TemplateComplete>> {
        let Some(template) = self.get_template(template_id).await? else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {TEMPLATE_DAY_COLUMNS} FROM template_days
             WHERE template_id = $1
             ORDER BY day_number"
        );

        let days = sqlx::query_as::<_, TemplateDay>(&sql)
            .bind(template_id)
            .fetch_all(&self.db)
            .await?;

        let exercise_lists =
            try_join_all(days.iter().map(|day| self.template_day_exercises(day.id))).await?;

        Ok(Some(TemplateComplete {
            template,
            days: days
                .into_iter()
                .zip(exercise_lists)
                .map(|(day, exercises)| TemplateDayWithExercises { day, exercises })
                .collect(),
        }))
    }

    async fn template_day_exercises(
        &self,
        template_day_id: Uuid,
    ) -> Result<Vec<TemplateDayExerciseDetail>> {
        let sql = format!(
            "SELECT tde.id, tde.template_day_id, tde.exercise_id, tde.sets, tde.reps,
                    tde.rest_seconds, tde.notes, tde.order_index, tde.created_at,
                    {EXERCISE_PREFIXED_COLUMNS}
             FROM template_day_exercises tde
             JOIN exercises e ON e.id = tde.exercise_id
             WHERE tde.template_day_id = $1
             ORDER BY tde.order_index"
        );

        let rows = sqlx::query(&sql)
            .bind(template_day_id)
            .fetch_all(&self.db)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(TemplateDayExerciseDetail {
                    entry: template_day_exercise_from_row(row)?,
                    exercise: exercise_from_prefixed_row(row)?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    pub async fn update_template(
        &self,
        template_id: Uuid,
        data: UpdateTemplate,
    ) -> Result<Option<TrainingTemplate>> {
        let sql = format!(
            "UPDATE training_templates
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 is_public = COALESCE($4, is_public),
                 updated_at = $5
             WHERE id = $1
             RETURNING {TEMPLATE_COLUMNS}"
        );

        let template = sqlx::query_as::<_, TrainingTemplate>(&sql)
            .bind(template_id)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.is_public)
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?;

        Ok(template)
    }

    pub async fn delete_template(&self, template_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_templates WHERE id = $1")
            .bind(template_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn create_template_day(
        &self,
        template_id: Uuid,
        data: CreateTemplateDay,
    ) -> Result<TemplateDay> {
        let sql = format!(
            "INSERT INTO template_days (template_id, day_number, day_name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {TEMPLATE_DAY_COLUMNS}"
        );

        let day = sqlx::query_as::<_, TemplateDay>(&sql)
            .bind(template_id)
            .bind(data.day_number)
            .bind(&data.day_name)
            .bind(&data.description)
            .fetch_one(&self.db)
            .await?;

        Ok(day)
    }

    /// Owning trainer of a template day, for authorization checks
    pub async fn template_day_owner(&self, template_day_id: Uuid) -> Result<Option<Uuid>> {
        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT t.trainer_id FROM template_days td
             JOIN training_templates t ON t.id = td.template_id
             WHERE td.id = $1",
        )
        .bind(template_day_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(owner)
    }

    pub async fn delete_template_day(&self, template_day_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM template_days WHERE id = $1")
            .bind(template_day_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn add_exercise_to_template_day(
        &self,
        template_day_id: Uuid,
        data: AddDayExercise,
    ) -> Result<TemplateDayExercise> {
        let entry = sqlx::query_as::<_, TemplateDayExercise>(
            "INSERT INTO template_day_exercises
                (template_day_id, exercise_id, sets, reps, rest_seconds, notes, order_index)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, template_day_id, exercise_id, sets, reps, rest_seconds, notes,
                       order_index, created_at",
        )
        .bind(template_day_id)
        .bind(data.exercise_id)
        .bind(data.sets)
        .bind(&data.reps)
        .bind(data.rest_seconds)
        .bind(&data.notes)
        .bind(data.order_index)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    /// Owning trainer of a template-day exercise, for authorization checks
    pub async fn template_day_exercise_owner(
        &self,
        template_day_exercise_id: Uuid,
    ) -> Result<Option<Uuid>> {
        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT t.trainer_id FROM template_day_exercises tde
             JOIN template_days td ON td.id = tde.template_day_id
             JOIN training_templates t ON t.id = td.template_id
             WHERE tde.id = $1",
        )
        .bind(template_day_exercise_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(owner)
    }

    pub async fn remove_exercise_from_template_day(
        &self,
        template_day_exercise_id: Uuid,
    ) -> Result<bool> {
        let result = sqlx::query("DELETE FROM template_day_exercises WHERE id = $1")
            .bind(template_day_exercise_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Assign a template to a student. The assignment record and the
    /// copy of the template into the student's own days commit or roll
    /// back together; an assignment row can never exist without its
    /// copied days.
    pub async fn assign_template(
        &self,
        template_id: Uuid,
        student_id: Uuid,
        trainer_id: Uuid,
        notes: Option<String>,
    ) -> Result<TemplateAssignment> {
        let mut tx = self.db.begin().await?;

        let sql = format!(
            "INSERT INTO template_assignments (template_id, student_id, trainer_id, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {ASSIGNMENT_COLUMNS}"
        );

        let assignment = sqlx::query_as::<_, TemplateAssignment>(&sql)
            .bind(template_id)
            .bind(student_id)
            .bind(trainer_id)
            .bind(&notes)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("SELECT copy_template_to_user($1, $2)")
            .bind(template_id)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(assignment)
    }

    /// A student's assignments, newest first, each embedding its template
    pub async fn student_assignments(&self, student_id: Uuid) -> Result<Vec<AssignmentWithTemplate>> {
        let sql = format!(
            "SELECT a.id, a.template_id, a.student_id, a.trainer_id, a.notes, a.assigned_at,
                    t.id AS t_id, t.trainer_id AS t_trainer_id, t.name AS t_name,
                    t.description AS t_description, t.is_public AS t_is_public,
                    t.created_at AS t_created_at, t.updated_at AS t_updated_at
             FROM template_assignments a
             JOIN training_templates t ON t.id = a.template_id
             WHERE a.student_id = $1
             ORDER BY a.assigned_at DESC"
        );

        let rows = sqlx::query(&sql)
            .bind(student_id)
            .fetch_all(&self.db)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(AssignmentWithTemplate {
                    assignment: assignment_from_row(row)?,
                    template: template_from_prefixed_row(row)?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }
}

fn template_day_exercise_from_row(row: &PgRow) -> Result<TemplateDayExercise, sqlx::Error> {
    Ok(TemplateDayExercise {
        id: row.try_get("id")?,
        template_day_id: row.try_get("template_day_id")?,
        exercise_id: row.try_get("exercise_id")?,
        sets: row.try_get("sets")?,
        reps: row.try_get("reps")?,
        rest_seconds: row.try_get("rest_seconds")?,
        notes: row.try_get("notes")?,
        order_index: row.try_get("order_index")?,
        created_at: row.try_get("created_at")?,
    })
}

fn assignment_from_row(row: &PgRow) -> Result<TemplateAssignment, sqlx::Error> {
    Ok(TemplateAssignment {
        id: row.try_get("id")?,
        template_id: row.try_get("template_id")?,
        student_id: row.try_get("student_id")?,
        trainer_id: row.try_get("trainer_id")?,
        notes: row.try_get("notes")?,
        assigned_at: row.try_get("assigned_at")?,
    })
}

fn template_from_prefixed_row(row: &PgRow) -> Result<TrainingTemplate, sqlx::Error> {
    Ok(TrainingTemplate {
        id: row.try_get("t_id")?,
        trainer_id: row.try_get("t_trainer_id")?,
        name: row.try_get("t_name")?,
        description: row.try_get("t_description")?,
        is_public: row.try_get("t_is_public")?,
        created_at: row.try_get("t_created_at")?,
        updated_at: row.try_get("t_updated_at")?,
    })
}
