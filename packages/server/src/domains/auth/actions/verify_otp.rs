//! Verify OTP action - consumes the pending entry and creates the account

use tracing::info;

use crate::common::ApiError;
use crate::domains::auth::models::NewUser;
use crate::domains::auth::otp::{ConsumeOutcome, DraftProfile};
use crate::domains::auth::password::hash_password;
use crate::domains::auth::types::{AuthResponse, UserProjection, VerifyOtpRequest};
use crate::domains::auth::validate::{normalize_email, parse_date_of_birth};
use crate::kernel::{CreateUserError, ServerDeps};

/// Complete a signup: check the submitted code, hash the password, persist
/// the account, and issue a session token.
///
/// Missing entry, wrong code, and expired entry all answer with the same
/// generic error.
pub async fn verify_otp(
    request: VerifyOtpRequest,
    deps: &ServerDeps,
) -> Result<AuthResponse, ApiError> {
    let email = normalize_email(&request.email);

    let profile = match deps.otp_ledger.consume(&email, &request.otp) {
        ConsumeOutcome::Rejected => {
            return Err(ApiError::Authentication("Invalid or expired OTP".into()));
        }
        ConsumeOutcome::Consumed { profile } => profile,
    };

    // The draft profile is written at signup; the resubmitted fields only
    // matter if it is somehow absent.
    let profile = match profile {
        Some(profile) => profile,
        None => draft_from_request(&request)?,
    };

    let password_hash = hash_password(&request.password).await?;

    let new_user = NewUser {
        email,
        password_hash: Some(password_hash),
        name: profile.name.trim().to_owned(),
        date_of_birth: Some(profile.date_of_birth),
        google_id: None,
    };

    let user = match deps.users.create(new_user).await {
        Ok(user) => user,
        // The account appeared through another path since signup.
        Err(CreateUserError::Duplicate) => {
            return Err(ApiError::Conflict("User already exists".into()));
        }
        Err(CreateUserError::Other(error)) => return Err(error.into()),
    };

    info!(user_id = %user.id, "account created after OTP verification");

    let token = deps.jwt_service.create_token(user.id, user.email.clone())?;

    Ok(AuthResponse {
        token,
        user: UserProjection::from(&user),
    })
}

fn draft_from_request(request: &VerifyOtpRequest) -> Result<DraftProfile, ApiError> {
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::Validation("Name and date of birth are required".into()))?;
    let date_of_birth = request
        .date_of_birth
        .as_deref()
        .and_then(parse_date_of_birth)
        .ok_or_else(|| ApiError::Validation("Name and date of birth are required".into()))?;

    Ok(DraftProfile {
        name: name.to_owned(),
        date_of_birth,
    })
}
