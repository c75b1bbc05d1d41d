//! Application-level authorization decisions.
//!
//! Role gates live in the request extractors; the checks here compare the
//! caller against document ownership after the documents are loaded.

use bson::oid::ObjectId;

use crate::error::{ApiError, ApiResult};

/// Only the company that owns the referenced job may change an
/// application's status. Mismatch is reported as bad input, matching the
/// existing client contract.
pub fn ensure_can_update_status(job_owner: Option<ObjectId>, caller: ObjectId) -> ApiResult<()> {
    match job_owner {
        Some(owner) if owner == caller => Ok(()),
        _ => Err(ApiError::bad_request(
            "Not authorized to update this application",
        )),
    }
}

/// Only the original applicant may delete an application.
pub fn ensure_can_delete(applicant: ObjectId, caller: ObjectId) -> ApiResult<()> {
    if applicant == caller {
        Ok(())
    } else {
        Err(ApiError::bad_request(
            "Not authorized to delete this application",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owning_company_may_update_status() {
        let owner = ObjectId::new();
        assert!(ensure_can_update_status(Some(owner), owner).is_ok());
    }

    #[test]
    fn other_company_may_not_update_status() {
        let err = ensure_can_update_status(Some(ObjectId::new()), ObjectId::new()).unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to update this application");
    }

    #[test]
    fn deleted_job_blocks_status_update() {
        assert!(ensure_can_update_status(None, ObjectId::new()).is_err());
    }

    #[test]
    fn applicant_may_delete_own_application() {
        let applicant = ObjectId::new();
        assert!(ensure_can_delete(applicant, applicant).is_ok());
    }

    #[test]
    fn stranger_may_not_delete_application() {
        let err = ensure_can_delete(ObjectId::new(), ObjectId::new()).unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to delete this application");
    }
}
