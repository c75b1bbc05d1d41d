//! Shared data models for the job board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Users and roles
//! - Job postings with status/type enumerations
//! - Applications with status enumeration
//! - Per-status application count summaries

pub mod application;
pub mod job;
pub mod user;

// Re-export common types
pub use application::{Application, ApplicationStatus, StatusCounts};
pub use job::{Job, JobStatus, JobType};
pub use user::{Role, User};

use thiserror::Error;

/// Raised when a request carries a value outside an enumerated set.
///
/// The message text is client-facing; the API layer forwards it verbatim
/// in validation responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not supported")]
pub struct UnsupportedValue(pub String);
