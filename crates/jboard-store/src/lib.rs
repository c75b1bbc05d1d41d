//! MongoDB persistence layer.
//!
//! This crate provides:
//! - Connection/config handling and unique-index bootstrap
//! - Typed repositories for users, jobs and applications
//! - The job query/filter/sort/pagination builder
//! - Group-by-status aggregation for dashboards
//! - A store error taxonomy (duplicate key, invalid id, database)

pub mod applications;
pub mod client;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod query;
pub mod users;

pub use applications::{
    ApplicantSummary, ApplicationRepository, AppliedJob, AppliedPosition, CompanyApplication,
    CountScope, SeekerApplication,
};
pub use client::{Store, StoreConfig};
pub use error::{parse_object_id, StoreError, StoreResult};
pub use jobs::{JobPage, JobPatch, JobRepository};
pub use query::{JobFilter, Page, PageInfo, SortKey};
pub use users::UserRepository;
