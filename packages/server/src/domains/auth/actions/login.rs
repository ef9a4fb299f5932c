//! Password login action

use crate::common::ApiError;
use crate::domains::auth::password::verify_password;
use crate::domains::auth::types::{AuthResponse, LoginRequest, UserProjection};
use crate::domains::auth::validate::normalize_email;
use crate::kernel::ServerDeps;

/// Authenticate with email + password.
///
/// Unknown email, federation-only account, and wrong password all answer
/// with the same generic error.
pub async fn login(request: LoginRequest, deps: &ServerDeps) -> Result<AuthResponse, ApiError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    }

    let email = normalize_email(&request.email);
    let invalid = || ApiError::Authentication("Invalid credentials".into());

    let user = deps
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    let password_hash = user.password_hash.as_deref().ok_or_else(invalid)?;

    if !verify_password(&request.password, password_hash).await? {
        return Err(invalid());
    }

    let token = deps.jwt_service.create_token(user.id, user.email.clone())?;

    Ok(AuthResponse {
        token,
        user: UserProjection::from(&user),
    })
}
