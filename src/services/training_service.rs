use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    AddDayExercise, CreateTrainingDay, DayExercise, DayExerciseDetail, ExerciseSet, LogSetRequest,
    SessionSetDetail, TrainingDay, TrainingDayWithExercises, TrainingSession,
    TrainingSessionWithDay,
};
use crate::services::{
    exercise_from_prefixed_row, optional_exercise_from_prefixed_row, EXERCISE_PREFIXED_COLUMNS,
};

const DAY_COLUMNS: &str = "id, user_id, day_number, day_name, description, template_id, \
     assigned_by, created_at, updated_at";

const SESSION_COLUMNS: &str = "id, user_id, training_day_id, start_time, end_time, \
     duration_seconds, completed, notes, created_at";

const SET_COLUMNS: &str = "id, training_session_id, day_exercise_id, exercise_id, set_number, \
     weight_kg, reps, completed, rest_seconds, notes, created_at";

/// Elapsed whole seconds between the recorded start and the finish instant.
/// Derived from the recorder's clock on purpose; no correction for skew
/// against any other clock.
pub fn session_duration_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    (end - start).num_seconds() as i32
}

#[derive(Debug, Clone)]
pub struct TrainingService {
    db: PgPool,
}

impl TrainingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// A user's days ordered by day_number, each with its exercises ordered
    /// by order_index. One sub-fetch per day, run concurrently; if any
    /// sub-fetch fails the whole read fails.
    pub async fn training_days(&self, user_id: Uuid) -> Result<Vec<TrainingDayWithExercises>> {
        let sql = format!(
            "SELECT {DAY_COLUMNS} FROM training_days
             WHERE user_id = $1
             ORDER BY day_number"
        );

        let days = sqlx::query_as::<_, TrainingDay>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        let exercise_lists =
            try_join_all(days.iter().map(|day| self.day_exercises(day.id))).await?;

        Ok(days
            .into_iter()
            .zip(exercise_lists)
            .map(|(day, exercises)| TrainingDayWithExercises { day, exercises })
            .collect())
    }

    async fn day_exercises(&self, day_id: Uuid) -> Result<Vec<DayExerciseDetail>> {
        let sql = format!(
            "SELECT de.id, de.training_day_id, de.exercise_id, de.sets, de.reps,
                    de.rest_seconds, de.notes, de.order_index, de.created_at,
                    {EXERCISE_PREFIXED_COLUMNS}
             FROM day_exercises de
             JOIN exercises e ON e.id = de.exercise_id
             WHERE de.training_day_id = $1
             ORDER BY de.order_index"
        );

        let rows = sqlx::query(&sql).bind(day_id).fetch_all(&self.db).await?;

        rows.iter()
            .map(|row| {
                Ok(DayExerciseDetail {
                    entry: day_exercise_from_row(row)?,
                    exercise: exercise_from_prefixed_row(row)?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    pub async fn create_day(&self, user_id: Uuid, data: CreateTrainingDay) -> Result<TrainingDay> {
        let sql = format!(
            "INSERT INTO training_days (user_id, day_number, day_name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {DAY_COLUMNS}"
        );

        let day = sqlx::query_as::<_, TrainingDay>(&sql)
            .bind(user_id)
            .bind(data.day_number)
            .bind(&data.day_name)
            .bind(&data.description)
            .fetch_one(&self.db)
            .await?;

        Ok(day)
    }

    pub async fn get_day(&self, day_id: Uuid) -> Result<Option<TrainingDay>> {
        let sql = format!("SELECT {DAY_COLUMNS} FROM training_days WHERE id = $1");

        let day = sqlx::query_as::<_, TrainingDay>(&sql)
            .bind(day_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(day)
    }

    pub async fn add_exercise_to_day(
        &self,
        day_id: Uuid,
        data: AddDayExercise,
    ) -> Result<DayExercise> {
        let entry = sqlx::query_as::<_, DayExercise>(
            "INSERT INTO day_exercises
                (training_day_id, exercise_id, sets, reps, rest_seconds, notes, order_index)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, training_day_id, exercise_id, sets, reps, rest_seconds, notes,
                       order_index, created_at",
        )
        .bind(day_id)
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

    /// Owning user of a day-exercise row, for authorization checks
    pub async fn day_exercise_owner(&self, day_exercise_id: Uuid) -> Result<Option<Uuid>> {
        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT td.user_id FROM day_exercises de
             JOIN training_days td ON td.id = de.training_day_id
             WHERE de.id = $1",
        )
        .bind(day_exercise_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(owner)
    }

    pub async fn remove_exercise_from_day(&self, day_exercise_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM day_exercises WHERE id = $1")
            .bind(day_exercise_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_exercise_order(
        &self,
        day_exercise_id: Uuid,
        order_index: i32,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE day_exercises SET order_index = $2 WHERE id = $1")
            .bind(day_exercise_id)
            .bind(order_index)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Start a session: stamps start_time now, not yet completed
    pub async fn start_session(&self, user_id: Uuid, day_id: Uuid) -> Result<TrainingSession> {
        let sql = format!(
            "INSERT INTO training_sessions (user_id, training_day_id, start_time)
             VALUES ($1, $2, $3)
             RETURNING {SESSION_COLUMNS}"
        );

        let session = sqlx::query_as::<_, TrainingSession>(&sql)
            .bind(user_id)
            .bind(day_id)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        Ok(session)
    }

    pub async fn get_session(&self, session_id: Uuid) -> Result<Option<TrainingSession>> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM training_sessions WHERE id = $1");

        let session = sqlx::query_as::<_, TrainingSession>(&sql)
            .bind(session_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(session)
    }

    /// Close a session: end_time now, duration derived from the supplied
    /// start time, completed = true.
    pub async fn finish_session(
        &self,
        session_id: Uuid,
        start_time: DateTime<Utc>,
    ) -> Result<Option<TrainingSession>> {
        let end_time = Utc::now();
        let duration = session_duration_seconds(start_time, end_time);

        let sql = format!(
            "UPDATE training_sessions
             SET end_time = $2, duration_seconds = $3, completed = TRUE
             WHERE id = $1
             RETURNING {SESSION_COLUMNS}"
        );

        let session = sqlx::query_as::<_, TrainingSession>(&sql)
            .bind(session_id)
            .bind(end_time)
            .bind(duration)
            .fetch_optional(&self.db)
            .await?;

        Ok(session)
    }

    /// Log one completed set. There is no partial-set representation;
    /// completed is always true.
    pub async fn log_set(&self, session_id: Uuid, data: LogSetRequest) -> Result<ExerciseSet> {
        let sql = format!(
            "INSERT INTO exercise_sets
                (training_session_id, day_exercise_id, exercise_id, set_number,
                 weight_kg, reps, rest_seconds, notes, completed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
             RETURNING {SET_COLUMNS}"
        );

        let set = sqlx::query_as::<_, ExerciseSet>(&sql)
            .bind(session_id)
            .bind(data.day_exercise_id)
            .bind(data.exercise_id)
            .bind(data.set_number)
            .bind(data.weight_kg)
            .bind(data.reps)
            .bind(data.rest_seconds)
            .bind(&data.notes)
            .fetch_one(&self.db)
            .await?;

        Ok(set)
    }

    /// Session history, most recent first, each embedding its day
    pub async fn sessions(&self, user_id: Uuid) -> Result<Vec<TrainingSessionWithDay>> {
        let sql = format!(
            "SELECT s.id, s.user_id, s.training_day_id, s.start_time, s.end_time,
                    s.duration_seconds, s.completed, s.notes, s.created_at,
                    td.id AS d_id, td.user_id AS d_user_id, td.day_number AS d_day_number,
                    td.day_name AS d_day_name, td.description AS d_description,
                    td.template_id AS d_template_id, td.assigned_by AS d_assigned_by,
                    td.created_at AS d_created_at, td.updated_at AS d_updated_at
             FROM training_sessions s
             LEFT JOIN training_days td ON td.id = s.training_day_id
             WHERE s.user_id = $1
             ORDER BY s.start_time DESC"
        );

        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.db).await?;

        rows.iter()
            .map(|row| {
                Ok(TrainingSessionWithDay {
                    session: session_from_row(row)?,
                    training_day: optional_day_from_prefixed_row(row)?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    /// Sets of one session in logged order, each embedding its exercise
    pub async fn session_sets(&self, session_id: Uuid) -> Result<Vec<SessionSetDetail>> {
        let sql = format!(
            "SELECT xs.id, xs.training_session_id, xs.day_exercise_id, xs.exercise_id,
                    xs.set_number, xs.weight_kg, xs.reps, xs.completed, xs.rest_seconds,
                    xs.notes, xs.created_at,
                    {EXERCISE_PREFIXED_COLUMNS}
             FROM exercise_sets xs
             LEFT JOIN exercises e ON e.id = xs.exercise_id
             WHERE xs.training_session_id = $1
             ORDER BY xs.created_at"
        );

        let rows = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&self.db)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(SessionSetDetail {
                    set: set_from_row(row)?,
                    exercise: optional_exercise_from_prefixed_row(row)?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }
}

fn day_exercise_from_row(row: &PgRow) -> Result<DayExercise, sqlx::Error> {
    Ok(DayExercise {
        id: row.try_get("id")?,
        training_day_id: row.try_get("training_day_id")?,
        exercise_id: row.try_get("exercise_id")?,
        sets: row.try_get("sets")?,
        reps: row.try_get("reps")?,
        rest_seconds: row.try_get("rest_seconds")?,
        notes: row.try_get("notes")?,
        order_index: row.try_get("order_index")?,
        created_at: row.try_get("created_at")?,
    })
}

fn session_from_row(row: &PgRow) -> Result<TrainingSession, sqlx::Error> {
    Ok(TrainingSession {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        training_day_id: row.try_get("training_day_id")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        duration_seconds: row.try_get("duration_seconds")?,
        completed: row.try_get("completed")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn set_from_row(row: &PgRow) -> Result<ExerciseSet, sqlx::Error> {
    Ok(ExerciseSet {
        id: row.try_get("id")?,
        training_session_id: row.try_get("training_session_id")?,
        day_exercise_id: row.try_get("day_exercise_id")?,
        exercise_id: row.try_get("exercise_id")?,
        set_number: row.try_get("set_number")?,
        weight_kg: row.try_get("weight_kg")?,
        reps: row.try_get("reps")?,
        completed: row.try_get("completed")?,
        rest_seconds: row.try_get("rest_seconds")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn optional_day_from_prefixed_row(row: &PgRow) -> Result<Option<TrainingDay>, sqlx::Error> {
    let id: Option<Uuid> = row.try_get("d_id")?;
    if id.is_none() {
        return Ok(None);
    }

    Ok(Some(TrainingDay {
        id: row.try_get("d_id")?,
        user_id: row.try_get("d_user_id")?,
        day_number: row.try_get("d_day_number")?,
        day_name: row.try_get("d_day_name")?,
        description: row.try_get("d_description")?,
        template_id: row.try_get("d_template_id")?,
        assigned_by: row.try_get("d_assigned_by")?,
        created_at: row.try_get("d_created_at")?,
        updated_at: row.try_get("d_updated_at")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn duration_is_floor_of_elapsed_seconds() {
        let end = Utc::now();
        let start = end - Duration::seconds(125);

        assert_eq!(session_duration_seconds(start, end), 125);
    }

    #[test]
    fn duration_truncates_subsecond_remainder() {
        let end = Utc::now();
        let start = end - Duration::milliseconds(125_900);

        assert_eq!(session_duration_seconds(start, end), 125);
    }
}
