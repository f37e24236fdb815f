use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::api::routes::AppState;
use crate::api::ApiError;
use crate::auth::{jwt_auth_middleware, UserSession};
use crate::models::{Exercise, NewExercise};

/// Exercise library routes for regular users
pub fn exercise_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_available))
        .route("/personal", post(create_personal))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Exercises visible to the caller: global, their trainer's, their own
#[tracing::instrument(skip(state))]
async fn list_available(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let profile = state.auth_service.load_profile(session.user_id).await?;
    let exercises = state
        .exercise_service
        .available_for(session.user_id, profile.trainer_id)
        .await?;

    Ok(Json(exercises))
}

/// Create a personal exercise owned by the caller
#[tracing::instrument(skip(state, data))]
async fn create_personal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(data): Json<NewExercise>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise = state
        .exercise_service
        .create_personal_exercise(session.user_id, data)
        .await?;

    Ok(Json(exercise))
}
