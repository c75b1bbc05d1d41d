//! Store error taxonomy.

use bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-index violation, carrying the offending field name.
    #[error("Duplicate value for field: {field}. Please use another value.")]
    Duplicate { field: String },

    /// Malformed document id in a request path or body.
    #[error("No item found with id: {0}")]
    InvalidId(String),

    #[error("database error: {0}")]
    Database(mongodb::error::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bson::de::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }

    pub fn is_invalid_id(&self) -> bool {
        matches!(self, StoreError::InvalidId(_))
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        if let Some(field) = duplicate_key_field(&err) {
            return StoreError::Duplicate { field };
        }
        StoreError::Database(err)
    }
}

/// Parse a hex document id, mapping malformed input to `InvalidId` so the
/// API layer can answer with the same not-found shape as a missing document.
pub fn parse_object_id(raw: &str) -> StoreResult<ObjectId> {
    raw.parse::<ObjectId>()
        .map_err(|_| StoreError::InvalidId(raw.to_string()))
}

const DUPLICATE_KEY_CODE: i32 = 11000;

fn duplicate_key_field(err: &mongodb::error::Error) -> Option<String> {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE => {
            Some(index_field(&write.message))
        }
        ErrorKind::Command(command) if command.code == DUPLICATE_KEY_CODE => {
            Some(index_field(&command.message))
        }
        _ => None,
    }
}

/// Extract the field name from a duplicate-key message, e.g.
/// `... index: email_1 dup key: { email: "a@b.c" }` yields `email`.
fn index_field(message: &str) -> String {
    let Some(rest) = message
        .split_once("index: ")
        .map(|(_, rest)| rest)
    else {
        return "unknown".to_string();
    };
    let index_name = rest.split_whitespace().next().unwrap_or("unknown");
    match index_name.rsplit_once('_') {
        Some((field, suffix)) if !field.is_empty() && suffix.parse::<i32>().is_ok() => {
            field.to_string()
        }
        _ => index_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_from_ascending_index_name() {
        let msg = "E11000 duplicate key error collection: jobboard.users \
                   index: email_1 dup key: { email: \"a@b.c\" }";
        assert_eq!(index_field(msg), "email");
    }

    #[test]
    fn field_from_descending_index_name() {
        let msg = "E11000 duplicate key error collection: jobboard.users \
                   index: name_-1 dup key: { name: \"alice\" }";
        assert_eq!(index_field(msg), "name");
    }

    #[test]
    fn unparseable_message_falls_back() {
        assert_eq!(index_field("something went sideways"), "unknown");
    }

    #[test]
    fn invalid_id_message_matches_not_found_shape() {
        let err = parse_object_id("not-a-hex-id").unwrap_err();
        assert_eq!(err.to_string(), "No item found with id: not-a-hex-id");
        assert!(err.is_invalid_id());
    }

    #[test]
    fn valid_id_parses() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn duplicate_message_names_field() {
        let err = StoreError::Duplicate {
            field: "email".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate value for field: email. Please use another value."
        );
    }
}
