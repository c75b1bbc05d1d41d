//! Registration, login and account management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use jboard_models::{Role, User};

use crate::auth::{AuthUser, Caller};
use crate::error::{ApiError, ApiResult};
use crate::password;
use crate::state::AppState;

/// Public view of an account, used in auth responses.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub name: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Role wire string; defaults to the job-seeker role.
    pub role: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;
    let role = match payload.role.as_deref() {
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        None => Role::default(),
    };

    let password_hash = password::hash(&payload.password)?;
    let user = state
        .store
        .users()
        .create(User::new(payload.name, payload.email, password_hash, role))
        .await?;

    let id = user
        .id
        .ok_or_else(|| ApiError::internal("created user has no id"))?;
    let token = state.tokens.sign(Caller { id, role })?;

    tracing::info!(user = %id, role = %role, "registered user");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&user),
            token,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::bad_request("Please provide email and password"));
    };

    // Unknown email and wrong password answer identically.
    let user = state
        .store
        .users()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid Credentials"))?;
    if !password::verify(&password, &user.password) {
        return Err(ApiError::unauthorized("Invalid Credentials"));
    }

    let id = user
        .id
        .ok_or_else(|| ApiError::internal("stored user has no id"))?;
    let token = state.tokens.sign(Caller {
        id,
        role: user.role,
    })?;

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
}

/// Profile responses also carry the email so clients can refresh the
/// stored account without another round trip.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileView,
    pub msg: String,
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    if payload.name.is_none() && payload.email.is_none() {
        return Err(ApiError::bad_request(
            "Please provide name or email to update",
        ));
    }
    payload.validate()?;

    let users = state.store.users();

    // Pre-checks give friendlier messages than the raw duplicate-key path.
    if let Some(name) = payload.name.as_deref() {
        if let Some(existing) = users.find_by_name(name).await? {
            if existing.id != Some(caller.id) {
                return Err(ApiError::bad_request("Name already taken"));
            }
        }
    }
    if let Some(email) = payload.email.as_deref() {
        if let Some(existing) = users.find_by_email(email).await? {
            if existing.id != Some(caller.id) {
                return Err(ApiError::bad_request("Email already in use"));
            }
        }
    }

    // The token can outlive the account; answer as for any missing document.
    let updated = users
        .update_profile(caller.id, payload.name.as_deref(), payload.email.as_deref())
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No user found with id: {}", caller.id.to_hex()))
        })?;

    Ok(Json(ProfileResponse {
        user: ProfileView::from(&updated),
        msg: "Profile updated successfully".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let (Some(current), Some(new)) = (payload.current_password, payload.new_password) else {
        return Err(ApiError::bad_request(
            "Please provide both current and new password",
        ));
    };
    if new.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let users = state.store.users();
    let user = users
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No user found with id: {}", caller.id.to_hex()))
        })?;
    if !password::verify(&current, &user.password) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let new_hash = password::hash(&new)?;
    users.update_password(caller.id, &new_hash).await?;

    Ok(Json(serde_json::json!({
        "msg": "Password updated successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_response_carries_email_and_message() {
        let user = User::new(
            "Ada Lovelace".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            Role::JobSeeker,
        );
        let response = ProfileResponse {
            user: ProfileView::from(&user),
            msg: "Profile updated successfully".to_string(),
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["user"]["name"], "Ada Lovelace");
        assert_eq!(value["user"]["email"], "ada@example.com");
        assert_eq!(value["user"]["role"], "user");
        assert_eq!(value["msg"], "Profile updated successfully");
    }

    #[test]
    fn auth_user_view_omits_email() {
        let user = User::new(
            "Acme Corp".to_string(),
            "hr@acme.com".to_string(),
            "hash".to_string(),
            Role::Company,
        );
        let value = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(value["name"], "Acme Corp");
        assert_eq!(value["role"], "company");
        assert!(value.get("email").is_none());
    }
}
