use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Visibility tier of an exercise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "exercise_scope", rename_all = "lowercase")]
pub enum ExerciseScope {
    Global,
    Trainer,
    Personal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub scope: ExerciseScope,
    pub owner_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exercise {
    /// Visibility rule: global exercises are visible to everyone,
    /// trainer-scoped ones to that trainer's students, personal ones to
    /// their owner. Mirrors the disjunctive filter the library query runs
    /// server-side.
    pub fn visible_to(&self, user_id: Uuid, trainer_id: Option<Uuid>) -> bool {
        match self.scope {
            ExerciseScope::Global => true,
            ExerciseScope::Trainer => self.owner_id.is_some() && self.owner_id == trainer_id,
            ExerciseScope::Personal => self.owner_id == Some(user_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(scope: ExerciseScope, owner_id: Option<Uuid>) -> Exercise {
        let now = Utc::now();
        Exercise {
            id: Uuid::new_v4(),
            name: "Back squat".to_string(),
            description: None,
            muscle_group: Some("legs".to_string()),
            difficulty: None,
            instructions: None,
            video_url: None,
            image_url: None,
            scope,
            owner_id,
            created_by: owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn global_visible_to_everyone() {
        let ex = exercise(ExerciseScope::Global, None);
        assert!(ex.visible_to(Uuid::new_v4(), None));
        assert!(ex.visible_to(Uuid::new_v4(), Some(Uuid::new_v4())));
    }

    #[test]
    fn trainer_scope_requires_matching_trainer() {
        let trainer = Uuid::new_v4();
        let ex = exercise(ExerciseScope::Trainer, Some(trainer));

        assert!(ex.visible_to(Uuid::new_v4(), Some(trainer)));
        // Another trainer's students see nothing
        assert!(!ex.visible_to(Uuid::new_v4(), Some(Uuid::new_v4())));
        // No assigned trainer: the trainer disjunct matches nothing
        assert!(!ex.visible_to(Uuid::new_v4(), None));
    }

    #[test]
    fn personal_scope_requires_owner() {
        let owner = Uuid::new_v4();
        let ex = exercise(ExerciseScope::Personal, Some(owner));

        assert!(ex.visible_to(owner, None));
        assert!(!ex.visible_to(Uuid::new_v4(), Some(owner)));
    }

    #[test]
    fn visibility_is_exact_union() {
        let user = Uuid::new_v4();
        let trainer = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let library = vec![
            exercise(ExerciseScope::Global, None),
            exercise(ExerciseScope::Trainer, Some(trainer)),
            exercise(ExerciseScope::Trainer, Some(stranger)),
            exercise(ExerciseScope::Personal, Some(user)),
            exercise(ExerciseScope::Personal, Some(stranger)),
        ];

        let visible: Vec<_> = library
            .iter()
            .filter(|e| e.visible_to(user, Some(trainer)))
            .collect();

        assert_eq!(visible.len(), 3);
        assert!(visible
            .iter()
            .all(|e| e.scope == ExerciseScope::Global
                || e.owner_id == Some(trainer)
                || e.owner_id == Some(user)));
    }
}
