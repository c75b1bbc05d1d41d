//! Dashboard aggregate counts.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use jboard_models::StatusCounts;
use jboard_store::CountScope;

use crate::auth::{CompanyUser, JobSeekerUser};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStatsResponse {
    pub total_jobs: u64,
    pub total_applications: i64,
    pub application_stats: StatusCounts,
}

/// Job and application counts over the caller's postings. A company with
/// no applications still gets the full zero-filled breakdown.
pub async fn company_stats(
    State(state): State<AppState>,
    CompanyUser(caller): CompanyUser,
) -> ApiResult<Json<CompanyStatsResponse>> {
    let job_ids = state.store.jobs().ids_for_company(caller.id).await?;
    let total_jobs = job_ids.len() as u64;
    let stats = state
        .store
        .applications()
        .status_counts(&CountScope::Jobs(job_ids))
        .await?;

    Ok(Json(CompanyStatsResponse {
        total_jobs,
        total_applications: stats.total(),
        application_stats: stats,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub total_applications: i64,
    pub application_stats: StatusCounts,
}

/// Application counts for the caller's own submissions.
pub async fn user_stats(
    State(state): State<AppState>,
    JobSeekerUser(caller): JobSeekerUser,
) -> ApiResult<Json<UserStatsResponse>> {
    let stats = state
        .store
        .applications()
        .status_counts(&CountScope::Applicant(caller.id))
        .await?;

    Ok(Json(UserStatsResponse {
        total_applications: stats.total(),
        application_stats: stats,
    }))
}
