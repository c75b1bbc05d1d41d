//! Session tokens and role-gated request extractors.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use bson::oid::ObjectId;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use jboard_models::Role;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const INVALID_TOKEN_MSG: &str = "Authentication invalid";
const ROLE_MISMATCH_MSG: &str = "Not authorized to access this route";

/// Authenticated caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: ObjectId,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id, hex.
    sub: String,
    /// Role wire string.
    role: String,
    iat: i64,
    exp: i64,
}

/// HS256 signing and verification keys plus token lifetime.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Build keys from `JWT_SECRET`.
    pub fn from_env(ttl: Duration) -> ApiResult<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| ApiError::internal("JWT_SECRET not set"))?;
        Ok(Self::new(&secret, ttl))
    }

    /// Issue a session token for the caller.
    pub fn sign(&self, caller: Caller) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: caller.id.to_hex(),
            role: caller.role.as_str().to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("token signing failed: {e}")))
    }

    /// Verify a token and recover the caller identity. Any defect in the
    /// token (signature, expiry, claim shape) maps to the same 401.
    pub fn verify(&self, token: &str) -> ApiResult<Caller> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ApiError::unauthorized(INVALID_TOKEN_MSG))?;
        let id = data
            .claims
            .sub
            .parse::<ObjectId>()
            .map_err(|_| ApiError::unauthorized(INVALID_TOKEN_MSG))?;
        let role = data
            .claims
            .role
            .parse::<Role>()
            .map_err(|_| ApiError::unauthorized(INVALID_TOKEN_MSG))?;
        Ok(Caller { id, role })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Any authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Caller);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts).ok_or_else(|| ApiError::unauthorized(INVALID_TOKEN_MSG))?;
        let caller = state.tokens.verify(token)?;
        Ok(AuthUser(caller))
    }
}

/// Caller identity when present; anonymous requests (and requests with
/// unverifiable tokens) degrade to `None` instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<Caller>);

#[axum::async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = bearer_token(parts).and_then(|token| state.tokens.verify(token).ok());
        Ok(OptionalAuthUser(caller))
    }
}

/// Authenticated caller with the company role.
#[derive(Debug, Clone, Copy)]
pub struct CompanyUser(pub Caller);

#[axum::async_trait]
impl FromRequestParts<AppState> for CompanyUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;
        match caller.role {
            Role::Company => Ok(CompanyUser(caller)),
            Role::JobSeeker => Err(ApiError::unauthorized(ROLE_MISMATCH_MSG)),
        }
    }
}

/// Authenticated caller with the job-seeker role.
#[derive(Debug, Clone, Copy)]
pub struct JobSeekerUser(pub Caller);

#[axum::async_trait]
impl FromRequestParts<AppState> for JobSeekerUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;
        match caller.role {
            Role::JobSeeker => Ok(JobSeekerUser(caller)),
            Role::Company => Err(ApiError::unauthorized(ROLE_MISMATCH_MSG)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn sign_verify_round_trip() {
        let keys = keys();
        let caller = Caller {
            id: ObjectId::new(),
            role: Role::Company,
        };
        let token = keys.sign(caller).unwrap();
        let verified = keys.verify(&token).unwrap();
        assert_eq!(verified, caller);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let caller = Caller {
            id: ObjectId::new(),
            role: Role::JobSeeker,
        };
        let token = keys().sign(caller).unwrap();
        let other = TokenKeys::new("another-secret", Duration::from_secs(3600));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let caller = Caller {
            id: ObjectId::new(),
            role: Role::JobSeeker,
        };
        let mut token = keys().sign(caller).unwrap();
        token.push('x');
        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: ObjectId::new().to_hex(),
            role: "user".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_subject_is_rejected() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "not-an-object-id".to_string(),
            role: "user".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
