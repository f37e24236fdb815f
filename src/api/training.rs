use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::api::ApiError;
use crate::auth::{jwt_auth_middleware, UserSession};
use crate::models::{
    AddDayExercise, AssignmentWithTemplate, CreateTrainingDay, DayExercise, ExerciseSet,
    FinishSessionRequest, LogSetRequest, SessionSetDetail, StartSessionRequest, TrainingDay,
    TrainingDayWithExercises, TrainingSession, TrainingSessionWithDay, UpdateExerciseOrder,
};

/// Personal training routes: days, live sessions, history, assignments
pub fn training_routes(state: AppState) -> Router {
    Router::new()
        .route("/days", get(list_days).post(create_day))
        .route("/days/:day_id/exercises", post(add_day_exercise))
        .route("/day-exercises/:id", delete(remove_day_exercise))
        .route("/day-exercises/:id/order", put(reorder_day_exercise))
        .route("/sessions", get(list_sessions).post(start_session))
        .route("/sessions/:id/finish", put(finish_session))
        .route("/sessions/:id/sets", get(list_session_sets).post(log_set))
        .route("/assignments", get(list_assignments))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// The caller's plan: days in order, exercises embedded
#[tracing::instrument(skip(state))]
async fn list_days(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<TrainingDayWithExercises>>, ApiError> {
    let days = state.training_service.training_days(session.user_id).await?;
    Ok(Json(days))
}

#[tracing::instrument(skip(state, data))]
async fn create_day(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(data): Json<CreateTrainingDay>,
) -> Result<Json<TrainingDay>, ApiError> {
    let day = state
        .training_service
        .create_day(session.user_id, data)
        .await?;

    Ok(Json(day))
}

#[tracing::instrument(skip(state, data))]
async fn add_day_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(day_id): Path<Uuid>,
    Json(data): Json<AddDayExercise>,
) -> Result<Json<DayExercise>, ApiError> {
    let day = state
        .training_service
        .get_day(day_id)
        .await?
        .ok_or(ApiError::NotFound("Training day"))?;

    if day.user_id != session.user_id {
        return Err(ApiError::Forbidden);
    }

    let entry = state
        .training_service
        .add_exercise_to_day(day_id, data)
        .await?;

    Ok(Json(entry))
}

#[tracing::instrument(skip(state))]
async fn remove_day_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_day_exercise_owner(&state, id, session.user_id).await?;

    state.training_service.remove_exercise_from_day(id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[tracing::instrument(skip(state, data))]
async fn reorder_day_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateExerciseOrder>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_day_exercise_owner(&state, id, session.user_id).await?;

    state
        .training_service
        .update_exercise_order(id, data.order_index)
        .await?;

    Ok(Json(serde_json::json!({ "updated": true })))
}

/// Session history, most recent first
#[tracing::instrument(skip(state))]
async fn list_sessions(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<TrainingSessionWithDay>>, ApiError> {
    let sessions = state.training_service.sessions(session.user_id).await?;
    Ok(Json(sessions))
}

#[tracing::instrument(skip(state, data))]
async fn start_session(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(data): Json<StartSessionRequest>,
) -> Result<Json<TrainingSession>, ApiError> {
    let day = state
        .training_service
        .get_day(data.training_day_id)
        .await?
        .ok_or(ApiError::NotFound("Training day"))?;

    if day.user_id != session.user_id {
        return Err(ApiError::Forbidden);
    }

    let started = state
        .training_service
        .start_session(session.user_id, data.training_day_id)
        .await?;

    Ok(Json(started))
}

#[tracing::instrument(skip(state, data))]
async fn finish_session(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
    Json(data): Json<FinishSessionRequest>,
) -> Result<Json<TrainingSession>, ApiError> {
    require_session_owner(&state, id, session.user_id).await?;

    let finished = state
        .training_service
        .finish_session(id, data.start_time)
        .await?
        .ok_or(ApiError::NotFound("Training session"))?;

    Ok(Json(finished))
}

#[tracing::instrument(skip(state, data))]
async fn log_set(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
    Json(data): Json<LogSetRequest>,
) -> Result<Json<ExerciseSet>, ApiError> {
    require_session_owner(&state, id, session.user_id).await?;

    let set = state.training_service.log_set(id, data).await?;
    Ok(Json(set))
}

/// Sets of one of the caller's sessions, in logged order
#[tracing::instrument(skip(state))]
async fn list_session_sets(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SessionSetDetail>>, ApiError> {
    require_session_owner(&state, id, session.user_id).await?;

    let sets = state.training_service.session_sets(id).await?;
    Ok(Json(sets))
}

/// The caller's template assignments, newest first
#[tracing::instrument(skip(state))]
async fn list_assignments(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<AssignmentWithTemplate>>, ApiError> {
    let assignments = state
        .trainer_service
        .student_assignments(session.user_id)
        .await?;

    Ok(Json(assignments))
}

async fn require_day_exercise_owner(
    state: &AppState,
    day_exercise_id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let owner = state
        .training_service
        .day_exercise_owner(day_exercise_id)
        .await?
        .ok_or(ApiError::NotFound("Day exercise"))?;

    if owner != user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(())
}

async fn require_session_owner(
    state: &AppState,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let session = state
        .training_service
        .get_session(session_id)
        .await?
        .ok_or(ApiError::NotFound("Training session"))?;

    if session.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(())
}
