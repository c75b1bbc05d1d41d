//! Request handlers.

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod jobs;

pub use health::{health, ready};
