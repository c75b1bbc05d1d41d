//! Job application model and dashboard count summary.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UnsupportedValue;

/// Review status of an application.
///
/// No transition graph is enforced: the owning company may set any
/// enumerated value directly, including moving an application backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Submitted,
    Reviewed,
    Accepted,
    Declined,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Declined => "declined",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "declined" => Ok(ApplicationStatus::Declined),
            other => Err(UnsupportedValue(other.to_string())),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Referenced job; must exist at creation time.
    pub job: ObjectId,

    /// Applicant user; owns deletion rights.
    pub applicant: ObjectId,

    #[serde(default)]
    pub status: ApplicationStatus,

    /// Reference URL returned by the resume store.
    pub resume_url: String,

    /// Storage key for the uploaded resume, kept for cleanup on delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_key: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Create a new application in the default `submitted` state.
    pub fn new(
        job: ObjectId,
        applicant: ObjectId,
        resume_url: impl Into<String>,
        resume_key: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            job,
            applicant,
            status: ApplicationStatus::default(),
            resume_url: resume_url.into(),
            resume_key,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fixed-shape per-status application counts for dashboards.
///
/// Every status key is always present; statuses missing from the grouped
/// store result stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub submitted: i64,
    pub reviewed: i64,
    pub accepted: i64,
    pub declined: i64,
}

impl StatusCounts {
    /// Fold `(status, count)` pairs from a group-by-status aggregation.
    /// Unknown status strings are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut counts = Self::default();
        for (status, count) in pairs {
            match status.parse::<ApplicationStatus>() {
                Ok(ApplicationStatus::Submitted) => counts.submitted += count,
                Ok(ApplicationStatus::Reviewed) => counts.reviewed += count,
                Ok(ApplicationStatus::Accepted) => counts.accepted += count,
                Ok(ApplicationStatus::Declined) => counts.declined += count,
                Err(_) => {}
            }
        }
        counts
    }

    /// Total across all statuses.
    pub fn total(&self) -> i64 {
        self.submitted + self.reviewed + self.accepted + self.declined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_rejects_unknown() {
        let err = "archived".parse::<ApplicationStatus>().unwrap_err();
        assert_eq!(err.to_string(), "archived is not supported");
    }

    #[test]
    fn new_application_defaults_to_submitted() {
        let app = Application::new(ObjectId::new(), ObjectId::new(), "https://cdn/resume.pdf", None);
        assert_eq!(app.status, ApplicationStatus::Submitted);
    }

    #[test]
    fn counts_zero_fill_missing_statuses() {
        let counts = StatusCounts::from_pairs(vec![("accepted".to_string(), 3)]);
        assert_eq!(counts.accepted, 3);
        assert_eq!(counts.submitted, 0);
        assert_eq!(counts.reviewed, 0);
        assert_eq!(counts.declined, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn counts_empty_aggregation_is_all_zero() {
        let counts = StatusCounts::from_pairs(Vec::new());
        assert_eq!(counts, StatusCounts::default());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn counts_ignore_unknown_groups() {
        let counts = StatusCounts::from_pairs(vec![
            ("submitted".to_string(), 2),
            ("bogus".to_string(), 9),
        ]);
        assert_eq!(counts.submitted, 2);
        assert_eq!(counts.total(), 2);
    }
}
