// API routes and handlers

pub mod admin;
pub mod auth;
pub mod error;
pub mod exercises;
pub mod guard;
pub mod health;
pub mod pages;
pub mod routes;
pub mod trainer;
pub mod training;

pub use error::ApiError;
pub use routes::{create_routes, AppState};
