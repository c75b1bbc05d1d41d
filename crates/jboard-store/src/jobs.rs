//! Job repository.

use bson::oid::ObjectId;
use bson::{doc, DateTime, Document};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use jboard_models::{Job, JobStatus, JobType};

use crate::error::StoreResult;
use crate::metrics;
use crate::query::{JobFilter, Page, PageInfo, SortKey};

const COLLECTION: &str = "jobs";

/// One page of a job listing.
#[derive(Debug, Clone)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub info: PageInfo,
}

/// Partial update to a job posting. Only set fields are written.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub salary: Option<u64>,
    pub tags: Option<Vec<String>>,
}

impl JobPatch {
    fn to_set_document(&self) -> Document {
        let mut set = doc! { "updatedAt": DateTime::now() };
        if let Some(company) = &self.company {
            set.insert("company", company);
        }
        if let Some(position) = &self.position {
            set.insert("position", position);
        }
        if let Some(status) = self.status {
            set.insert("status", status.as_str());
        }
        if let Some(job_type) = self.job_type {
            set.insert("type", job_type.as_str());
        }
        if let Some(location) = &self.location {
            set.insert("location", location);
        }
        if let Some(salary) = self.salary {
            set.insert("salary", salary as i64);
        }
        if let Some(tags) = &self.tags {
            set.insert("tags", Job::normalize_tags(tags.clone()));
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct JobRepository {
    collection: Collection<Job>,
}

impl JobRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    pub async fn create(&self, mut job: Job) -> StoreResult<Job> {
        metrics::observe(COLLECTION, "insert", async {
            let result = self.collection.insert_one(&job).await?;
            job.id = result.inserted_id.as_object_id();
            Ok(job)
        })
        .await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Job>> {
        metrics::observe(COLLECTION, "find_by_id", async {
            Ok(self.collection.find_one(doc! { "_id": id }).await?)
        })
        .await
    }

    /// Filtered, sorted, paginated listing plus a total count over the same
    /// filter. Skip/limit are recomputed per request.
    pub async fn search(
        &self,
        filter: &JobFilter,
        sort: Option<SortKey>,
        page: &Page,
    ) -> StoreResult<JobPage> {
        let filter_doc = filter.to_document();

        metrics::observe(COLLECTION, "search", async {
            let mut find = self
                .collection
                .find(filter_doc.clone())
                .skip(page.skip())
                .limit(page.limit());
            if let Some(sort) = sort {
                find = find.sort(sort.to_document());
            }
            let jobs: Vec<Job> = find.await?.try_collect().await?;
            let total = self.collection.count_documents(filter_doc).await?;
            Ok(JobPage {
                jobs,
                info: PageInfo::new(total, page),
            })
        })
        .await
    }

    /// Apply a patch to a job the caller owns. The `{_id, createdBy}` filter
    /// makes missing and not-owned indistinguishable: both return `None`.
    pub async fn update_owned(
        &self,
        id: ObjectId,
        owner: ObjectId,
        patch: &JobPatch,
    ) -> StoreResult<Option<Job>> {
        let update = doc! { "$set": patch.to_set_document() };

        metrics::observe(COLLECTION, "update_owned", async {
            let updated = self
                .collection
                .find_one_and_update(doc! { "_id": id, "createdBy": owner }, update)
                .return_document(ReturnDocument::After)
                .await?;
            Ok(updated)
        })
        .await
    }

    /// Delete a job the caller owns, returning the removed document.
    pub async fn delete_owned(&self, id: ObjectId, owner: ObjectId) -> StoreResult<Option<Job>> {
        metrics::observe(COLLECTION, "delete_owned", async {
            let deleted = self
                .collection
                .find_one_and_delete(doc! { "_id": id, "createdBy": owner })
                .await?;
            Ok(deleted)
        })
        .await
    }

    /// Ids of every posting owned by `owner`, for dashboard scoping.
    pub async fn ids_for_company(&self, owner: ObjectId) -> StoreResult<Vec<ObjectId>> {
        let ids_only = self.collection.clone_with_type::<Document>();
        metrics::observe(COLLECTION, "ids_for_company", async {
            let cursor = ids_only
                .find(doc! { "createdBy": owner })
                .projection(doc! { "_id": 1 })
                .await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            let ids = docs
                .iter()
                .filter_map(|d| d.get_object_id("_id").ok())
                .collect();
            Ok(ids)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_sets_only_provided_fields() {
        let patch = JobPatch {
            position: Some("Staff Engineer".to_string()),
            status: Some(JobStatus::Interview),
            ..Default::default()
        };
        let set = patch.to_set_document();
        assert_eq!(set.get_str("position").unwrap(), "Staff Engineer");
        assert_eq!(set.get_str("status").unwrap(), "interview");
        assert!(!set.contains_key("company"));
        assert!(!set.contains_key("salary"));
        assert!(set.contains_key("updatedAt"));
    }

    #[test]
    fn patch_lowercases_tags() {
        let patch = JobPatch {
            tags: Some(vec!["Rust".to_string(), "Backend".to_string()]),
            ..Default::default()
        };
        let set = patch.to_set_document();
        let tags = set.get_array("tags").unwrap();
        assert_eq!(tags[0].as_str().unwrap(), "rust");
        assert_eq!(tags[1].as_str().unwrap(), "backend");
    }

    #[test]
    fn patch_serializes_type_under_wire_name() {
        let patch = JobPatch {
            job_type: Some(JobType::PartTime),
            ..Default::default()
        };
        let set = patch.to_set_document();
        assert_eq!(set.get_str("type").unwrap(), "part-time");
    }
}
