//! Application handlers: submission with resume upload, listings,
//! status review and deletion.

use std::time::Instant;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jboard_models::{Application, ApplicationStatus};
use jboard_store::{parse_object_id, CompanyApplication, SeekerApplication};

use crate::auth::{CompanyUser, JobSeekerUser};
use crate::authz;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Wire representation of an application document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(rename = "_id")]
    pub id: String,
    pub job: String,
    pub applicant: String,
    pub status: ApplicationStatus,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationView {
    fn from(app: Application) -> Self {
        Self {
            id: app.id.map(|id| id.to_hex()).unwrap_or_default(),
            job: app.job.to_hex(),
            applicant: app.applicant.to_hex(),
            status: app.status,
            resume_url: app.resume_url,
            created_at: app.created_at,
            updated_at: app.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application: ApplicationView,
}

/// Submit an application: multipart body with a `job` id field and a
/// `resume` file. The upload happens before any document is written, so a
/// failed upload leaves no application behind.
pub async fn create_application(
    State(state): State<AppState>,
    JobSeekerUser(caller): JobSeekerUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApplicationResponse>)> {
    let mut job_id: Option<String> = None;
    let mut resume: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Resume upload failed"))?
    {
        match field.name() {
            Some("job") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::bad_request("Resume upload failed"))?;
                job_id = Some(value);
            }
            Some("resume") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::bad_request("Resume upload failed"))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::bad_request("Resume upload failed"))?;
                resume = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    // The job reference is vetted before the file: a missing posting is
    // reported even when no resume was attached.
    let job_id = require_job_id(job_id)?;
    let job_oid = parse_object_id(&job_id)?;
    state
        .store
        .jobs()
        .find_by_id(job_oid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No job found with id: {job_id}")))?;

    let (filename, bytes) = require_resume(resume)?;

    let start = Instant::now();
    let resume_ref = state
        .resumes
        .store(&caller.id.to_hex(), &filename, bytes)
        .await?;
    metrics::record_resume_upload_duration(start.elapsed().as_secs_f64());

    let application = state
        .store
        .applications()
        .create(Application::new(
            job_oid,
            caller.id,
            resume_ref.url,
            Some(resume_ref.key),
        ))
        .await?;
    metrics::record_application_created();
    tracing::info!(job = %job_id, applicant = %caller.id, "created application");

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            application: ApplicationView::from(application),
        }),
    ))
}

fn require_job_id(job_id: Option<String>) -> ApiResult<String> {
    job_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide job ID"))
}

fn require_resume(resume: Option<(String, Vec<u8>)>) -> ApiResult<(String, Vec<u8>)> {
    resume.ok_or_else(|| ApiError::bad_request("Resume upload failed"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobView {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekerApplicationView {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: ApplicationStatus,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<AppliedJobView>,
}

impl From<SeekerApplication> for SeekerApplicationView {
    fn from(app: SeekerApplication) -> Self {
        Self {
            id: app.id.to_hex(),
            status: app.status,
            resume_url: app.resume_url,
            created_at: app.created_at,
            job: app.job.map(|job| AppliedJobView {
                id: job.id.to_hex(),
                company: job.company,
                position: job.position,
                location: job.location,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse<T> {
    pub count: usize,
    pub applications: Vec<T>,
}

/// The caller's own applications, newest first, each with its job embedded.
pub async fn my_applications(
    State(state): State<AppState>,
    JobSeekerUser(caller): JobSeekerUser,
) -> ApiResult<Json<ApplicationListResponse<SeekerApplicationView>>> {
    let applications: Vec<SeekerApplicationView> = state
        .store
        .applications()
        .list_for_applicant(caller.id)
        .await?
        .into_iter()
        .map(SeekerApplicationView::from)
        .collect();

    Ok(Json(ApplicationListResponse {
        count: applications.len(),
        applications,
    }))
}

#[derive(Debug, Serialize)]
pub struct ApplicantView {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyApplicationView {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: ApplicationStatus,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<AppliedPositionView>,
}

#[derive(Debug, Serialize)]
pub struct AppliedPositionView {
    pub position: String,
}

impl From<CompanyApplication> for CompanyApplicationView {
    fn from(app: CompanyApplication) -> Self {
        Self {
            id: app.id.to_hex(),
            status: app.status,
            resume_url: app.resume_url,
            created_at: app.created_at,
            applicant: app.applicant.map(|a| ApplicantView {
                name: a.name,
                email: a.email,
            }),
            job: app.job.map(|j| AppliedPositionView {
                position: j.position,
            }),
        }
    }
}

/// Every application to the caller's postings.
pub async fn company_applications(
    State(state): State<AppState>,
    CompanyUser(caller): CompanyUser,
) -> ApiResult<Json<ApplicationListResponse<CompanyApplicationView>>> {
    let job_ids = state.store.jobs().ids_for_company(caller.id).await?;
    let applications: Vec<CompanyApplicationView> = if job_ids.is_empty() {
        Vec::new()
    } else {
        state
            .store
            .applications()
            .list_for_jobs(&job_ids)
            .await?
            .into_iter()
            .map(CompanyApplicationView::from)
            .collect()
    };

    Ok(Json(ApplicationListResponse {
        count: applications.len(),
        applications,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

pub async fn update_status(
    State(state): State<AppState>,
    CompanyUser(caller): CompanyUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    let status = payload
        .status
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide a status value"))?
        .parse::<ApplicationStatus>()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let oid = parse_object_id(&id)?;
    let applications = state.store.applications();
    let application = applications
        .find_by_id(oid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No application found with id: {id}")))?;

    let job_owner = state
        .store
        .jobs()
        .find_by_id(application.job)
        .await?
        .map(|job| job.created_by);
    authz::ensure_can_update_status(job_owner, caller.id)?;

    let updated = applications
        .set_status(oid, status)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No application found with id: {id}")))?;

    Ok(Json(ApplicationResponse {
        application: ApplicationView::from(updated),
    }))
}

pub async fn delete_application(
    State(state): State<AppState>,
    JobSeekerUser(caller): JobSeekerUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let oid = parse_object_id(&id)?;
    let applications = state.store.applications();
    let application = applications
        .find_by_id(oid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No application found with id: {id}")))?;

    authz::ensure_can_delete(application.applicant, caller.id)?;
    applications.delete(oid).await?;

    // Document deletion wins even if the object cleanup fails.
    if let Some(key) = application.resume_key {
        state.resumes.remove(&key).await;
    }

    tracing::info!(application = %id, "deleted application");
    Ok(Json(serde_json::json!({ "msg": "Application deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_job_field_asks_for_job_id() {
        let err = require_job_id(None).unwrap_err();
        assert_eq!(err.to_string(), "Please provide job ID");
        let err = require_job_id(Some(String::new())).unwrap_err();
        assert_eq!(err.to_string(), "Please provide job ID");
    }

    #[test]
    fn missing_resume_reports_upload_failure() {
        let err = require_resume(None).unwrap_err();
        assert_eq!(err.to_string(), "Resume upload failed");
        let ok = require_resume(Some(("cv.pdf".to_string(), vec![1, 2, 3])));
        assert!(ok.is_ok());
    }
}
