//! Service-level tests against a real database. Each test gets its own
//! database with the migrations applied.

use assert_matches::assert_matches;
use sqlx::PgPool;
use uuid::Uuid;

use gymplan::api::ApiError;
use gymplan::auth::{AuthError, AuthService, RegisterRequest, Role};
use gymplan::models::{
    AddDayExercise, CreateTemplate, CreateTemplateDay, CreateTrainingDay, NewExercise,
};
use gymplan::services::{ExerciseService, TrainerService, TrainingService};

async fn seed_user(pool: &PgPool, email: &str, role: Role) -> Uuid {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash) VALUES ($1, 'not-a-real-hash') RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(email)
        .bind(role)
        .execute(pool)
        .await
        .unwrap();

    id
}

fn new_exercise(name: &str) -> NewExercise {
    NewExercise {
        name: name.to_string(),
        description: None,
        muscle_group: None,
        difficulty: None,
        instructions: None,
        video_url: None,
        image_url: None,
    }
}

fn day_entry(exercise_id: Uuid, order_index: i32) -> AddDayExercise {
    AddDayExercise {
        exercise_id,
        sets: 3,
        reps: "10-12".to_string(),
        rest_seconds: 60,
        order_index,
        notes: None,
    }
}

fn template(name: &str) -> CreateTemplate {
    CreateTemplate {
        name: name.to_string(),
        description: None,
    }
}

fn template_day(day_number: i32, day_name: &str) -> CreateTemplateDay {
    CreateTemplateDay {
        day_number,
        day_name: day_name.to_string(),
        description: None,
    }
}

#[sqlx::test]
async fn template_complete_orders_days_and_exercises(pool: PgPool) {
    let trainer = seed_user(&pool, "trainer@example.com", Role::Trainer).await;
    let admin = seed_user(&pool, "admin@example.com", Role::Admin).await;

    let exercises = ExerciseService::new(pool.clone());
    let squat = exercises
        .create_global(admin, new_exercise("Squat"))
        .await
        .unwrap();
    let bench = exercises
        .create_global(admin, new_exercise("Bench press"))
        .await
        .unwrap();

    let trainers = TrainerService::new(pool.clone());
    let tpl = trainers
        .create_template(trainer, template("Upper/Lower"))
        .await
        .unwrap();

    // Created out of order on purpose; reads must still come back sorted
    let day_two = trainers
        .create_template_day(tpl.id, template_day(2, "Lower"))
        .await
        .unwrap();
    let day_one = trainers
        .create_template_day(tpl.id, template_day(1, "Upper"))
        .await
        .unwrap();

    trainers
        .add_exercise_to_template_day(day_one.id, day_entry(squat.id, 1))
        .await
        .unwrap();
    trainers
        .add_exercise_to_template_day(day_one.id, day_entry(bench.id, 0))
        .await
        .unwrap();

    let complete = trainers.template_complete(tpl.id).await.unwrap().unwrap();

    let day_numbers: Vec<i32> = complete.days.iter().map(|d| d.day.day_number).collect();
    assert_eq!(day_numbers, vec![1, 2]);

    let first_day = &complete.days[0];
    let order: Vec<i32> = first_day
        .exercises
        .iter()
        .map(|e| e.entry.order_index)
        .collect();
    assert_eq!(order, vec![0, 1]);
    assert_eq!(first_day.exercises[0].exercise.id, bench.id);
    assert_eq!(first_day.exercises[1].exercise.id, squat.id);

    assert_eq!(complete.days[1].day.id, day_two.id);
    assert!(complete.days[1].exercises.is_empty());
}

#[sqlx::test]
async fn newest_assignment_leads_student_history(pool: PgPool) {
    let trainer = seed_user(&pool, "trainer@example.com", Role::Trainer).await;
    let student = seed_user(&pool, "student@example.com", Role::User).await;

    let trainers = TrainerService::new(pool.clone());
    let first = trainers
        .create_template(trainer, template("Block 1"))
        .await
        .unwrap();
    let second = trainers
        .create_template(trainer, template("Block 2"))
        .await
        .unwrap();

    let earlier = trainers
        .assign_template(first.id, student, trainer, None)
        .await
        .unwrap();
    // Backdate so the ordering assertion does not ride on timestamp ties
    sqlx::query(
        "UPDATE template_assignments SET assigned_at = assigned_at - INTERVAL '1 hour'
         WHERE id = $1",
    )
    .bind(earlier.id)
    .execute(&pool)
    .await
    .unwrap();

    let latest = trainers
        .assign_template(second.id, student, trainer, Some("deload next week".to_string()))
        .await
        .unwrap();

    let history = trainers.student_assignments(student).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].assignment.id, latest.id);
    assert_eq!(history[0].template.id, second.id);
    assert_eq!(history[1].assignment.id, earlier.id);
}

#[sqlx::test]
async fn assignment_copies_template_days_to_student(pool: PgPool) {
    let trainer = seed_user(&pool, "trainer@example.com", Role::Trainer).await;
    let student = seed_user(&pool, "student@example.com", Role::User).await;
    let admin = seed_user(&pool, "admin@example.com", Role::Admin).await;

    let exercises = ExerciseService::new(pool.clone());
    let row = exercises
        .create_global(admin, new_exercise("Barbell row"))
        .await
        .unwrap();

    let trainers = TrainerService::new(pool.clone());
    let tpl = trainers
        .create_template(trainer, template("Pull focus"))
        .await
        .unwrap();
    let day = trainers
        .create_template_day(tpl.id, template_day(1, "Pull"))
        .await
        .unwrap();
    trainers
        .add_exercise_to_template_day(day.id, day_entry(row.id, 0))
        .await
        .unwrap();

    trainers
        .assign_template(tpl.id, student, trainer, None)
        .await
        .unwrap();

    let days = TrainingService::new(pool.clone())
        .training_days(student)
        .await
        .unwrap();

    assert_eq!(days.len(), 1);
    assert_eq!(days[0].day.day_name, "Pull");
    assert_eq!(days[0].day.template_id, Some(tpl.id));
    assert_eq!(days[0].day.assigned_by, Some(trainer));
    assert_eq!(days[0].exercises.len(), 1);
    assert_eq!(days[0].exercises[0].exercise.id, row.id);
}

#[sqlx::test]
async fn day_stays_listed_after_its_only_exercise_is_removed(pool: PgPool) {
    let user = seed_user(&pool, "lifter@example.com", Role::User).await;
    let admin = seed_user(&pool, "admin@example.com", Role::Admin).await;

    let exercise = ExerciseService::new(pool.clone())
        .create_global(admin, new_exercise("Leg press"))
        .await
        .unwrap();

    let training = TrainingService::new(pool.clone());
    let day = training
        .create_day(
            user,
            CreateTrainingDay {
                day_number: 1,
                day_name: "Legs".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let entry = training
        .add_exercise_to_day(day.id, day_entry(exercise.id, 0))
        .await
        .unwrap();

    assert!(training.remove_exercise_from_day(entry.id).await.unwrap());

    let days = training.training_days(user).await.unwrap();

    assert_eq!(days.len(), 1);
    assert_eq!(days[0].day.id, day.id);
    assert!(days[0].exercises.is_empty());
}

#[sqlx::test]
async fn assigning_to_unknown_student_is_not_found(pool: PgPool) {
    let trainer = seed_user(&pool, "trainer@example.com", Role::Trainer).await;

    let trainers = TrainerService::new(pool.clone());
    let tpl = trainers
        .create_template(trainer, template("Orphan"))
        .await
        .unwrap();

    let err = trainers
        .assign_template(tpl.id, Uuid::new_v4(), trainer, None)
        .await
        .unwrap_err();

    assert_matches!(
        ApiError::missing_reference(err, "Student"),
        ApiError::NotFound("Student")
    );
}

#[sqlx::test]
async fn duplicate_registration_is_a_conflict(pool: PgPool) {
    let auth = AuthService::new(pool.clone(), "test-secret");

    auth.register(RegisterRequest {
        email: "dup@example.com".to_string(),
        password: "training2024".to_string(),
    })
    .await
    .unwrap();

    let err = auth
        .register(RegisterRequest {
            email: "dup@example.com".to_string(),
            password: "training2024".to_string(),
        })
        .await
        .unwrap_err();

    assert_matches!(err, AuthError::EmailAlreadyExists);
}
