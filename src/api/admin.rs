use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::routes::AppState;
use crate::api::ApiError;
use crate::auth::{admin_only_middleware, jwt_auth_middleware, UserSession};
use crate::models::{Exercise, NewExercise, Profile, UpdateExercise, UpdateRoleRequest};

/// Admin routes: global exercise curation and role management
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/exercises/:id",
            put(update_exercise).delete(delete_exercise),
        )
        .route("/users/:id/role", put(update_role))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Full library, unscoped
#[tracing::instrument(skip(state))]
async fn list_exercises(
    State(state): State<AppState>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let exercises = state.exercise_service.list_all().await?;
    Ok(Json(exercises))
}

/// Create a global exercise
#[tracing::instrument(skip(state, data))]
async fn create_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(data): Json<NewExercise>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise = state
        .exercise_service
        .create_global(session.user_id, data)
        .await?;

    Ok(Json(exercise))
}

#[tracing::instrument(skip(state, data))]
async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateExercise>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise = state
        .exercise_service
        .update(id, data)
        .await?
        .ok_or(ApiError::NotFound("Exercise"))?;

    Ok(Json(exercise))
}

#[tracing::instrument(skip(state))]
async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.exercise_service.delete(id).await? {
        return Err(ApiError::NotFound("Exercise"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Change a user's role. Takes effect on profile reads immediately and
/// on token claims at the next login.
#[tracing::instrument(skip(state, data))]
async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateRoleRequest>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .profile_service
        .update_role(id, data.role)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(profile))
}
