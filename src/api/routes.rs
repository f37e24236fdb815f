use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::admin::admin_routes;
use super::auth::auth_routes;
use super::exercises::exercise_routes;
use super::health::health_check;
use super::pages::page_routes;
use super::trainer::trainer_routes;
use super::training::training_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService};
use crate::services::{ExerciseService, ProfileService, TrainerService, TrainingService};

/// Shared handler state: one service per concern, all over the same pool
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub exercise_service: ExerciseService,
    pub profile_service: ProfileService,
    pub training_service: TrainingService,
    pub trainer_service: TrainerService,
}

impl AppState {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            auth_service: AuthService::new(db.clone(), jwt_secret),
            exercise_service: ExerciseService::new(db.clone()),
            profile_service: ProfileService::new(db.clone()),
            training_service: TrainingService::new(db.clone()),
            trainer_service: TrainerService::new(db),
        }
    }
}

pub fn create_routes(db: PgPool, jwt_secret: &str) -> Router {
    let state = AppState::new(db, jwt_secret);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/exercises", exercise_routes(state.clone()))
        .nest("/api/training", training_routes(state.clone()))
        .nest("/api/trainer", trainer_routes(state.clone()))
        .nest("/api/admin", admin_routes(state.clone()))
        .merge(page_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(security_headers_layer())
        .layer(cors_layer())
}
