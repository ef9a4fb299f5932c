//! Auth domain wire types
//!
//! Request and response bodies for the auth endpoints. Request fields use
//! `#[serde(default)]` so missing fields reach validation as empty strings
//! and get the field-level message instead of a deserializer error.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::auth::models::User;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub password: String,
    /// Fallback only - the draft profile stored at signup normally wins.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleLoginRequest {
    /// Google-issued ID token from the client-side sign-in flow.
    #[serde(default)]
    pub token: String,
}

/// Acknowledgment returned by signup. Carries no secret material.
#[derive(Debug, Serialize)]
pub struct SignupAck {
    pub message: String,
}

/// Minimal user projection returned by auth operations - never the hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProjection {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserProjection {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Token + user projection returned by verify-otp, login, and google login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProjection,
}
