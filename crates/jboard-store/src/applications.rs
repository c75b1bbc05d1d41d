//! Application repository, including the dashboard aggregation.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::{doc, Bson, DateTime, Document};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::Deserialize;

use jboard_models::{Application, ApplicationStatus, StatusCounts};

use crate::error::StoreResult;
use crate::metrics;

const COLLECTION: &str = "applications";

/// Job fields embedded in a job seeker's application listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AppliedJob {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub company: String,
    pub position: String,
    pub location: String,
}

/// Job fields embedded in a company's application listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AppliedPosition {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub position: String,
}

/// Applicant fields embedded in a company's application listing.
/// Deliberately excludes the password hash.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicantSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
}

/// An application joined with its job, as listed for the applicant.
/// `job` is `None` when the posting has since been deleted.
#[derive(Debug, Clone, Deserialize)]
pub struct SeekerApplication {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(rename = "resumeUrl")]
    pub resume_url: String,
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: chrono::DateTime<Utc>,
    pub job: Option<AppliedJob>,
}

/// An application joined with its applicant and job, as listed for the
/// company that owns the posting.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyApplication {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(rename = "resumeUrl")]
    pub resume_url: String,
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: chrono::DateTime<Utc>,
    pub applicant: Option<ApplicantSummary>,
    pub job: Option<AppliedPosition>,
}

/// Which applications a dashboard aggregation covers.
#[derive(Debug, Clone)]
pub enum CountScope {
    /// Applications to any of these jobs (a company's postings).
    Jobs(Vec<ObjectId>),
    /// Applications submitted by this user.
    Applicant(ObjectId),
}

impl CountScope {
    fn to_match_document(&self) -> Document {
        match self {
            CountScope::Jobs(ids) => doc! { "job": { "$in": ids } },
            CountScope::Applicant(id) => doc! { "applicant": id },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    collection: Collection<Application>,
}

impl ApplicationRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    pub async fn create(&self, mut application: Application) -> StoreResult<Application> {
        metrics::observe(COLLECTION, "insert", async {
            let result = self.collection.insert_one(&application).await?;
            application.id = result.inserted_id.as_object_id();
            Ok(application)
        })
        .await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Application>> {
        metrics::observe(COLLECTION, "find_by_id", async {
            Ok(self.collection.find_one(doc! { "_id": id }).await?)
        })
        .await
    }

    /// Set the review status, returning the updated document.
    pub async fn set_status(
        &self,
        id: ObjectId,
        status: ApplicationStatus,
    ) -> StoreResult<Option<Application>> {
        metrics::observe(COLLECTION, "set_status", async {
            let updated = self
                .collection
                .find_one_and_update(
                    doc! { "_id": id },
                    doc! { "$set": { "status": status.as_str(), "updatedAt": DateTime::now() } },
                )
                .return_document(ReturnDocument::After)
                .await?;
            Ok(updated)
        })
        .await
    }

    pub async fn delete(&self, id: ObjectId) -> StoreResult<()> {
        metrics::observe(COLLECTION, "delete", async {
            self.collection.delete_one(doc! { "_id": id }).await?;
            Ok(())
        })
        .await
    }

    /// All applications by one job seeker, each joined with its job.
    pub async fn list_for_applicant(
        &self,
        applicant: ObjectId,
    ) -> StoreResult<Vec<SeekerApplication>> {
        let pipeline = vec![
            doc! { "$match": { "applicant": applicant } },
            doc! { "$lookup": {
                "from": "jobs",
                "localField": "job",
                "foreignField": "_id",
                "as": "jobDoc",
            } },
            doc! { "$project": {
                "status": 1,
                "resumeUrl": 1,
                "createdAt": 1,
                "job": { "$arrayElemAt": ["$jobDoc", 0] },
            } },
            doc! { "$sort": { "createdAt": -1 } },
        ];

        metrics::observe(COLLECTION, "list_for_applicant", async {
            let docs: Vec<Document> = self.collection.aggregate(pipeline).await?.try_collect().await?;
            docs.into_iter()
                .map(|d| Ok(bson::from_document(d)?))
                .collect()
        })
        .await
    }

    /// All applications to any of the given jobs, each joined with its
    /// applicant and job. Used for a company's review queue.
    pub async fn list_for_jobs(
        &self,
        job_ids: &[ObjectId],
    ) -> StoreResult<Vec<CompanyApplication>> {
        let pipeline = vec![
            doc! { "$match": { "job": { "$in": job_ids } } },
            doc! { "$lookup": {
                "from": "users",
                "localField": "applicant",
                "foreignField": "_id",
                "as": "applicantDoc",
            } },
            doc! { "$lookup": {
                "from": "jobs",
                "localField": "job",
                "foreignField": "_id",
                "as": "jobDoc",
            } },
            doc! { "$project": {
                "status": 1,
                "resumeUrl": 1,
                "createdAt": 1,
                "applicant": { "$arrayElemAt": ["$applicantDoc", 0] },
                "job": { "$arrayElemAt": ["$jobDoc", 0] },
            } },
            doc! { "$sort": { "createdAt": -1 } },
        ];

        metrics::observe(COLLECTION, "list_for_jobs", async {
            let docs: Vec<Document> = self.collection.aggregate(pipeline).await?.try_collect().await?;
            docs.into_iter()
                .map(|d| Ok(bson::from_document(d)?))
                .collect()
        })
        .await
    }

    /// Group-by-status counts over the scoped applications, zero-filled for
    /// statuses with no documents.
    pub async fn status_counts(&self, scope: &CountScope) -> StoreResult<StatusCounts> {
        let pipeline = vec![
            doc! { "$match": scope.to_match_document() },
            doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } },
        ];

        metrics::observe(COLLECTION, "status_counts", async {
            let docs: Vec<Document> = self.collection.aggregate(pipeline).await?.try_collect().await?;
            let pairs = docs.into_iter().filter_map(|d| {
                let status = d.get_str("_id").ok()?.to_string();
                let count = match d.get("count") {
                    Some(Bson::Int32(n)) => i64::from(*n),
                    Some(Bson::Int64(n)) => *n,
                    _ => return None,
                };
                Some((status, count))
            });
            Ok(StatusCounts::from_pairs(pairs))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_match_documents() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let jobs = CountScope::Jobs(vec![a, b]).to_match_document();
        let ids = jobs.get_document("job").unwrap().get_array("$in").unwrap();
        assert_eq!(ids.len(), 2);

        let applicant = CountScope::Applicant(a).to_match_document();
        assert_eq!(applicant.get_object_id("applicant").unwrap(), a);
    }

    #[test]
    fn seeker_view_deserializes_with_missing_job() {
        let doc = doc! {
            "_id": ObjectId::new(),
            "status": "reviewed",
            "resumeUrl": "https://cdn/resume.pdf",
            "createdAt": DateTime::now(),
        };
        let view: SeekerApplication = bson::from_document(doc).unwrap();
        assert_eq!(view.status, ApplicationStatus::Reviewed);
        assert!(view.job.is_none());
    }

    #[test]
    fn company_view_ignores_extra_applicant_fields() {
        let doc = doc! {
            "_id": ObjectId::new(),
            "status": "submitted",
            "resumeUrl": "https://cdn/resume.pdf",
            "createdAt": DateTime::now(),
            "applicant": {
                "_id": ObjectId::new(),
                "name": "alice",
                "email": "alice@example.com",
                "password": "$argon2id$...",
                "role": "user",
            },
            "job": {
                "_id": ObjectId::new(),
                "position": "Engineer",
                "company": "Acme",
            },
        };
        let view: CompanyApplication = bson::from_document(doc).unwrap();
        let applicant = view.applicant.unwrap();
        assert_eq!(applicant.name, "alice");
        assert_eq!(view.job.unwrap().position, "Engineer");
    }
}
