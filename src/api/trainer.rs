use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::api::ApiError;
use crate::auth::{jwt_auth_middleware, trainer_or_admin_middleware, UserSession};
use crate::models::{
    AddDayExercise, AssignTemplateRequest, AssignmentWithTemplate, CreateTemplate,
    CreateTemplateDay, Exercise, NewExercise, Profile, TemplateAssignment, TemplateComplete,
    TemplateDay, TemplateDayExercise, TrainingTemplate, UpdateTemplate,
};

/// Trainer routes: template authoring, assignment and student management
pub fn trainer_routes(state: AppState) -> Router {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/templates/:id/days", post(create_template_day))
        .route("/template-days/:id", delete(delete_template_day))
        .route("/template-days/:id/exercises", post(add_template_exercise))
        .route(
            "/template-day-exercises/:id",
            delete(remove_template_exercise),
        )
        .route("/exercises", post(create_trainer_exercise))
        .route("/assignments", post(assign_template))
        .route("/students", get(list_students))
        .route("/students/:id/assignments", get(student_assignments))
        .route_layer(middleware::from_fn(trainer_or_admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// The caller's own templates, newest first
#[tracing::instrument(skip(state))]
async fn list_templates(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<TrainingTemplate>>, ApiError> {
    let templates = state
        .trainer_service
        .trainer_templates(session.user_id)
        .await?;

    Ok(Json(templates))
}

#[tracing::instrument(skip(state, data))]
async fn create_template(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(data): Json<CreateTemplate>,
) -> Result<Json<TrainingTemplate>, ApiError> {
    let template = state
        .trainer_service
        .create_template(session.user_id, data)
        .await?;

    Ok(Json(template))
}

/// Fully expanded template with days and exercises
#[tracing::instrument(skip(state))]
async fn get_template(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateComplete>, ApiError> {
    require_template_owner(&state, id, &session).await?;

    let template = state
        .trainer_service
        .template_complete(id)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;

    Ok(Json(template))
}

#[tracing::instrument(skip(state, data))]
async fn update_template(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTemplate>,
) -> Result<Json<TrainingTemplate>, ApiError> {
    require_template_owner(&state, id, &session).await?;

    let template = state
        .trainer_service
        .update_template(id, data)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;

    Ok(Json(template))
}

#[tracing::instrument(skip(state))]
async fn delete_template(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_template_owner(&state, id, &session).await?;

    state.trainer_service.delete_template(id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[tracing::instrument(skip(state, data))]
async fn create_template_day(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateTemplateDay>,
) -> Result<Json<TemplateDay>, ApiError> {
    require_template_owner(&state, id, &session).await?;

    let day = state.trainer_service.create_template_day(id, data).await?;
    Ok(Json(day))
}

#[tracing::instrument(skip(state))]
async fn delete_template_day(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let owner = state
        .trainer_service
        .template_day_owner(id)
        .await?
        .ok_or(ApiError::NotFound("Template day"))?;

    if owner != session.user_id && !session.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    state.trainer_service.delete_template_day(id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[tracing::instrument(skip(state, data))]
async fn add_template_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
    Json(data): Json<AddDayExercise>,
) -> Result<Json<TemplateDayExercise>, ApiError> {
    let owner = state
        .trainer_service
        .template_day_owner(id)
        .await?
        .ok_or(ApiError::NotFound("Template day"))?;

    if owner != session.user_id && !session.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let entry = state
        .trainer_service
        .add_exercise_to_template_day(id, data)
        .await?;

    Ok(Json(entry))
}

#[tracing::instrument(skip(state))]
async fn remove_template_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let owner = state
        .trainer_service
        .template_day_exercise_owner(id)
        .await?
        .ok_or(ApiError::NotFound("Template exercise"))?;

    if owner != session.user_id && !session.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    state
        .trainer_service
        .remove_exercise_from_template_day(id)
        .await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Create a trainer-scoped exercise, visible to the caller's students
#[tracing::instrument(skip(state, data))]
async fn create_trainer_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(data): Json<NewExercise>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise = state
        .exercise_service
        .create_trainer_exercise(session.user_id, data)
        .await?;

    Ok(Json(exercise))
}

/// Assign a template to a student: record plus copied days, atomically
#[tracing::instrument(skip(state, data))]
async fn assign_template(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(data): Json<AssignTemplateRequest>,
) -> Result<Json<TemplateAssignment>, ApiError> {
    require_template_owner(&state, data.template_id, &session).await?;

    let assignment = state
        .trainer_service
        .assign_template(data.template_id, data.student_id, session.user_id, data.notes)
        .await
        .map_err(|err| ApiError::missing_reference(err, "Student"))?;

    Ok(Json(assignment))
}

/// Profiles assigned to the caller, ordered by email
#[tracing::instrument(skip(state))]
async fn list_students(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let students = state
        .profile_service
        .get_trainer_students(session.user_id)
        .await?;

    Ok(Json(students))
}

/// One student's assignment history. Only their own trainer or an admin
/// may look.
#[tracing::instrument(skip(state))]
async fn student_assignments(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AssignmentWithTemplate>>, ApiError> {
    let profile = state
        .profile_service
        .get_profile(id)
        .await?
        .ok_or(ApiError::NotFound("Student"))?;

    if profile.trainer_id != Some(session.user_id) && !session.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let assignments = state.trainer_service.student_assignments(id).await?;
    Ok(Json(assignments))
}

async fn require_template_owner(
    state: &AppState,
    template_id: Uuid,
    session: &UserSession,
) -> Result<(), ApiError> {
    let template = state
        .trainer_service
        .get_template(template_id)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;

    if template.trainer_id != session.user_id && !session.role.is_admin() {
        return Err(ApiError::Forbidden);
    }

    Ok(())
}
