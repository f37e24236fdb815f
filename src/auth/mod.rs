pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use jwt::{extract_bearer_token, JwtService};
pub use middleware::{
    admin_only_middleware, cors_layer, jwt_auth_middleware, security_headers_layer,
    trainer_or_admin_middleware,
};
pub use models::{
    AuthResponse, Claims, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
    Role, SessionResponse, TokenResponse, UserInfo, UserSession,
};
pub use service::AuthService;
