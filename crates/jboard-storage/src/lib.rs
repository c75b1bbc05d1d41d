//! Resume object storage.
//!
//! Wraps an S3-compatible bucket behind a small client and a `ResumeStore`
//! that validates file types, derives object keys and hands back persistent
//! references for the application documents.

pub mod client;
pub mod error;
pub mod resume;

pub use client::{ObjectStoreClient, ObjectStoreConfig};
pub use error::{StorageError, StorageResult};
pub use resume::{ResumeRef, ResumeStore};
