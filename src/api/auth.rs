use axum::{
    extract::{Request, State},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::api::routes::AppState;
use crate::auth::{
    extract_bearer_token, jwt_auth_middleware, AuthError, AuthResponse, LoginRequest,
    MessageResponse, RefreshTokenRequest, RegisterRequest, SessionResponse, TokenResponse,
    UserSession,
};

/// Authentication routes
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route(
            "/session",
            get(get_session).route_layer(middleware::from_fn_with_state(
                state.auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(state)
}

/// Register a new user
#[tracing::instrument(skip(state, request))]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.register(request).await?;
    Ok(Json(response))
}

/// Login user
#[tracing::instrument(skip(state, request))]
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// Refresh access token
#[tracing::instrument(skip(state, request))]
async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = state.auth_service.refresh_token(request).await?;
    Ok(Json(response))
}

/// Logout: reads the bearer token straight off the header so an
/// about-to-expire token can still be revoked
#[tracing::instrument(skip(state, request))]
async fn logout(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<MessageResponse>, AuthError> {
    let auth_header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;
    let response = state.auth_service.logout(token).await?;
    Ok(Json(response))
}

/// Current session with a fresh profile read
#[tracing::instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<SessionResponse>, AuthError> {
    let profile = state.auth_service.load_profile(session.user_id).await?;

    Ok(Json(SessionResponse {
        user_id: session.user_id,
        email: session.email,
        profile,
    }))
}
