//! Google Sign-In action

use tracing::{debug, info};

use crate::common::ApiError;
use crate::domains::auth::models::NewUser;
use crate::domains::auth::types::{AuthResponse, GoogleLoginRequest, UserProjection};
use crate::domains::auth::validate::normalize_email;
use crate::kernel::{CreateUserError, ServerDeps};

/// Fallback display name when Google supplies none.
const DEFAULT_GOOGLE_NAME: &str = "Google User";

/// Authenticate with a Google-issued ID token.
///
/// Accounts are keyed by the verified email claim: a match created through
/// any signup method is reused as-is (merge-by-email), otherwise a new
/// password-less account is created.
pub async fn google_login(
    request: GoogleLoginRequest,
    deps: &ServerDeps,
) -> Result<AuthResponse, ApiError> {
    let verifier = deps.identity_verifier.as_ref().ok_or_else(|| {
        ApiError::Configuration("Google authentication not configured".into())
    })?;

    let invalid = || ApiError::Authentication("Invalid Google token".into());

    let identity = verifier.verify(&request.token).await.map_err(|error| {
        debug!(error = %error, "google token verification failed");
        invalid()
    })?;

    // No account is looked up or created without a verified email claim.
    if !identity.email_verified {
        return Err(invalid());
    }
    let email = match identity.email.as_deref() {
        Some(email) => normalize_email(email),
        None => return Err(invalid()),
    };

    let existing = deps.users.find_by_email(&email).await?;

    let user = match existing {
        Some(user) => user,
        None => {
            let new_user = NewUser {
                email: email.clone(),
                password_hash: None,
                name: identity
                    .name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GOOGLE_NAME.into()),
                date_of_birth: None,
                google_id: Some(identity.subject.clone()),
            };
            match deps.users.create(new_user).await {
                Ok(user) => {
                    info!(user_id = %user.id, "account created from google login");
                    user
                }
                // Lost a first-login race; the account exists now, use it.
                Err(CreateUserError::Duplicate) => deps
                    .users
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!("account vanished after duplicate-key create")
                    })?,
                Err(CreateUserError::Other(error)) => return Err(error.into()),
            }
        }
    };

    let token = deps.jwt_service.create_token(user.id, user.email.clone())?;

    Ok(AuthResponse {
        token,
        user: UserProjection::from(&user),
    })
}
