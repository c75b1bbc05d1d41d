//! User account model and roles.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UnsupportedValue;

/// Caller role.
///
/// Serialized as `"user"` / `"company"`, the wire strings the existing
/// frontend and stored documents already use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Job seeker: applies to jobs, manages own applications.
    #[default]
    #[serde(rename = "user")]
    JobSeeker,
    /// Company: posts jobs, reviews applications to them.
    #[serde(rename = "company")]
    Company,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "user",
            Role::Company => "company",
        }
    }
}

impl FromStr for Role {
    type Err = UnsupportedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::JobSeeker),
            "company" => Ok(Role::Company),
            other => Err(UnsupportedValue(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User document.
///
/// `password` holds the Argon2 hash and never leaves the store layer;
/// API responses are built from dedicated DTOs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Display name, unique.
    pub name: String,

    /// Email address, unique.
    pub email: String,

    /// Argon2 password hash.
    pub password: String,

    #[serde(default)]
    pub role: Role,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record. `password` must already be hashed.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_strings() {
        assert_eq!(serde_json::to_string(&Role::JobSeeker).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Company).unwrap(), "\"company\"");
        assert_eq!("user".parse::<Role>().unwrap(), Role::JobSeeker);
        assert_eq!("company".parse::<Role>().unwrap(), Role::Company);
    }

    #[test]
    fn role_rejects_unknown_values() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "admin is not supported");
    }

    #[test]
    fn new_user_defaults() {
        let user = User::new("alice", "alice@example.com", "hash", Role::JobSeeker);
        assert!(user.id.is_none());
        assert_eq!(user.role, Role::JobSeeker);
        assert_eq!(user.created_at, user.updated_at);
    }
}
