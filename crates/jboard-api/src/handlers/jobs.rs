//! Job posting handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use jboard_models::{Job, JobStatus, JobType, Role, UnsupportedValue};
use jboard_store::{parse_object_id, JobFilter, JobPatch, Page, SortKey};

use crate::auth::{CompanyUser, OptionalAuthUser};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Wire representation of a job posting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    /// Document id under its stored name; clients address jobs by `_id`.
    #[serde(rename = "_id")]
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<u64>,
    pub tags: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            id: job.id.map(|id| id.to_hex()).unwrap_or_default(),
            company: job.company,
            position: job.position,
            status: job.status,
            job_type: job.job_type,
            location: job.location,
            salary: job.salary,
            tags: job.tags,
            created_by: job.created_by.to_hex(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobView,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub jobs: Vec<JobView>,
    pub total_jobs: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
}

/// Public listing; authenticated company callers see only their own
/// postings. An unverifiable token degrades to the anonymous view.
pub async fn list_jobs(
    State(state): State<AppState>,
    OptionalAuthUser(caller): OptionalAuthUser,
    Query(params): Query<ListJobsQuery>,
) -> ApiResult<Json<JobListResponse>> {
    let created_by = caller
        .filter(|c| c.role == Role::Company)
        .map(|c| c.id);

    let filter = JobFilter {
        search: params.search,
        status: params.status,
        job_type: params.job_type,
        created_by,
    };
    let sort = SortKey::parse(params.sort.as_deref());
    let page = Page::from_params(params.page.as_deref(), params.limit.as_deref());

    let result = state.store.jobs().search(&filter, sort, &page).await?;

    Ok(Json(JobListResponse {
        jobs: result.jobs.into_iter().map(JobView::from).collect(),
        total_jobs: result.info.total,
        current_page: result.info.current_page,
        total_pages: result.info.total_pages,
        page_size: result.info.page_size,
    }))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let oid = parse_object_id(&id)?;
    let job = state
        .store
        .jobs()
        .find_by_id(oid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No job with id: {id}")))?;
    Ok(Json(JobResponse {
        job: JobView::from(job),
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 100, message = "Please provide a company name (max 100 characters)"))]
    pub company: String,
    #[validate(length(min = 1, max = 100, message = "Please provide a position (max 100 characters)"))]
    pub position: String,
    #[validate(length(min = 1, max = 100, message = "Please provide a location (max 100 characters)"))]
    pub location: String,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary: Option<u64>,
    pub tags: Option<Vec<String>>,
}

pub async fn create_job(
    State(state): State<AppState>,
    CompanyUser(caller): CompanyUser,
    Json(payload): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    payload.validate()?;

    let mut job = Job::new(payload.company, payload.position, payload.location, caller.id);
    if let Some(status) = parse_enum::<JobStatus>(payload.status.as_deref())? {
        job.status = status;
    }
    if let Some(job_type) = parse_enum::<JobType>(payload.job_type.as_deref())? {
        job.job_type = job_type;
    }
    job.salary = payload.salary;
    if let Some(tags) = payload.tags {
        job.tags = Job::normalize_tags(tags);
    }

    let job = state.store.jobs().create(job).await?;
    metrics::record_job_created();
    tracing::info!(job = %job.id.map(|id| id.to_hex()).unwrap_or_default(), "created job");

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            job: JobView::from(job),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary: Option<u64>,
    pub tags: Option<Vec<String>>,
}

pub async fn update_job(
    State(state): State<AppState>,
    CompanyUser(caller): CompanyUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateJobRequest>,
) -> ApiResult<Json<JobResponse>> {
    // Provided-but-empty core fields are rejected outright.
    let emptied = [&payload.company, &payload.position, &payload.location]
        .into_iter()
        .any(|v| matches!(v.as_deref(), Some("")));
    if emptied {
        return Err(ApiError::bad_request("Please provide all values"));
    }

    let patch = JobPatch {
        company: payload.company,
        position: payload.position,
        location: payload.location,
        status: parse_enum::<JobStatus>(payload.status.as_deref())?,
        job_type: parse_enum::<JobType>(payload.job_type.as_deref())?,
        salary: payload.salary,
        tags: payload.tags,
    };

    let oid = parse_object_id(&id)?;
    // Missing and not-owned are deliberately indistinguishable here.
    let job = state
        .store
        .jobs()
        .update_owned(oid, caller.id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No job with id: {id}")))?;

    Ok(Json(JobResponse {
        job: JobView::from(job),
    }))
}

pub async fn delete_job(
    State(state): State<AppState>,
    CompanyUser(caller): CompanyUser,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let oid = parse_object_id(&id)?;
    let job = state
        .store
        .jobs()
        .delete_owned(oid, caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No job with id: {id}")))?;

    tracing::info!(job = %id, "deleted job");
    Ok(Json(JobResponse {
        job: JobView::from(job),
    }))
}

fn parse_enum<T>(raw: Option<&str>) -> ApiResult<Option<T>>
where
    T: std::str::FromStr<Err = UnsupportedValue>,
{
    raw.map(|s| s.parse::<T>())
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_enum_accepts_known_values() {
        let status = parse_enum::<JobStatus>(Some("interview")).unwrap();
        assert_eq!(status, Some(JobStatus::Interview));
        assert_eq!(parse_enum::<JobStatus>(None).unwrap(), None);
    }

    #[test]
    fn parse_enum_reports_unsupported_values() {
        let err = parse_enum::<JobType>(Some("freelance")).unwrap_err();
        assert_eq!(err.to_string(), "freelance is not supported");
    }

    #[test]
    fn job_view_serializes_wire_names() {
        let mut job = Job::new("Acme", "Engineer", "Remote", bson::oid::ObjectId::new());
        job.id = Some(bson::oid::ObjectId::new());
        let value = serde_json::to_value(JobView::from(job)).unwrap();
        assert!(value["_id"].is_string());
        assert!(value.get("id").is_none());
        assert_eq!(value["type"], "full-time");
        assert!(value.get("createdBy").is_some());
        assert!(value.get("created_by").is_none());
    }
}
