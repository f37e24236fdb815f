use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Role;
use crate::models::Profile;

const PROFILE_COLUMNS: &str = "id, email, role, trainer_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProfileService {
    db: PgPool,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");

        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(profile)
    }

    /// Change a profile's authorization tier. Token role claims catch up
    /// at the next login; profile reads are fresh immediately.
    pub async fn update_role(&self, user_id: Uuid, role: Role) -> Result<Option<Profile>> {
        let sql = format!(
            "UPDATE profiles SET role = $2, updated_at = $3
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        );

        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .bind(role)
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?;

        Ok(profile)
    }

    /// Profiles assigned to a trainer, ordered by email
    pub async fn get_trainer_students(&self, trainer_id: Uuid) -> Result<Vec<Profile>> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE trainer_id = $1
             ORDER BY email"
        );

        let students = sqlx::query_as::<_, Profile>(&sql)
            .bind(trainer_id)
            .fetch_all(&self.db)
            .await?;

        Ok(students)
    }
}
