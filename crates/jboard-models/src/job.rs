//! Job posting model.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UnsupportedValue;

/// Hiring pipeline status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
    Accepted,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
            JobStatus::Accepted => "accepted",
        }
    }
}

impl FromStr for JobStatus {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "interview" => Ok(JobStatus::Interview),
            "declined" => Ok(JobStatus::Declined),
            "accepted" => Ok(JobStatus::Accepted),
            other => Err(UnsupportedValue(other.to_string())),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobType {
    #[default]
    #[serde(rename = "full-time")]
    FullTime,
    #[serde(rename = "part-time")]
    PartTime,
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "internship")]
    Internship,
    #[serde(rename = "contract")]
    Contract,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Remote => "remote",
            JobType::Internship => "internship",
            JobType::Contract => "contract",
        }
    }
}

impl FromStr for JobType {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "remote" => Ok(JobType::Remote),
            "internship" => Ok(JobType::Internship),
            "contract" => Ok(JobType::Contract),
            other => Err(UnsupportedValue(other.to_string())),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job posting document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Company name, max 100 chars.
    pub company: String,

    /// Position title, max 100 chars.
    pub position: String,

    #[serde(default)]
    pub status: JobStatus,

    #[serde(rename = "type", default)]
    pub job_type: JobType,

    /// Job location, max 100 chars.
    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<u64>,

    /// Lowercased tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Owning company user.
    pub created_by: ObjectId,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job posting owned by `created_by`.
    pub fn new(
        company: impl Into<String>,
        position: impl Into<String>,
        location: impl Into<String>,
        created_by: ObjectId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            company: company.into(),
            position: position.into(),
            status: JobStatus::default(),
            job_type: JobType::default(),
            location: location.into(),
            salary: None,
            tags: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Tags are stored lowercase; applied on every write path.
    pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
        tags.into_iter().map(|t| t.to_lowercase()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_wire_strings() {
        assert_eq!(JobType::FullTime.as_str(), "full-time");
        assert_eq!("part-time".parse::<JobType>().unwrap(), JobType::PartTime);
        assert!("freelance".parse::<JobType>().is_err());
    }

    #[test]
    fn job_status_round_trip() {
        for s in ["pending", "interview", "declined", "accepted"] {
            assert_eq!(s.parse::<JobStatus>().unwrap().as_str(), s);
        }
    }

    #[test]
    fn new_job_defaults() {
        let job = Job::new("Acme", "Engineer", "Remote", ObjectId::new());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.job_type, JobType::FullTime);
        assert!(job.tags.is_empty());
        assert!(job.salary.is_none());
    }

    #[test]
    fn tags_are_lowercased() {
        let tags = Job::normalize_tags(vec!["Rust".into(), "BACKEND".into()]);
        assert_eq!(tags, vec!["rust", "backend"]);
    }

    #[test]
    fn type_field_serializes_as_type() {
        let job = Job::new("Acme", "Engineer", "Remote", ObjectId::new());
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["type"], "full-time");
        assert_eq!(value["status"], "pending");
    }
}
