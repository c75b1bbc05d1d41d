//! Axum HTTP API server.
//!
//! This crate provides:
//! - JWT session auth with role-gated extractors
//! - Job, application, auth and dashboard endpoints
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod auth;
pub mod authz;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
