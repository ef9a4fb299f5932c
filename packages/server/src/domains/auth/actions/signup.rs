//! Signup action - validates input and issues a verification code

use tracing::{info, warn};

use crate::common::ApiError;
use crate::domains::auth::otp::DraftProfile;
use crate::domains::auth::types::{SignupAck, SignupRequest};
use crate::domains::auth::validate::{normalize_email, validate_signup};
use crate::kernel::ServerDeps;

const OTP_EMAIL_SUBJECT: &str = "Notes App - Verify your email";

/// Start a signup: validate, reject existing accounts, store a pending
/// verification, and dispatch the code by email.
///
/// With no mail channel configured the code only goes to the logs
/// (non-production fallback). A configured channel that fails to send
/// fails the signup; the pending entry stays behind, orphaned.
pub async fn signup(request: SignupRequest, deps: &ServerDeps) -> Result<SignupAck, ApiError> {
    let valid = validate_signup(&request)?;
    let email = normalize_email(&valid.email);

    if deps.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let code = deps.otp_ledger.issue(
        &email,
        DraftProfile {
            name: valid.name.clone(),
            date_of_birth: valid.date_of_birth,
        },
    );

    match &deps.mailer {
        Some(mailer) => {
            if let Err(error) = mailer
                .send(&email, OTP_EMAIL_SUBJECT, &otp_email_body(&code))
                .await
            {
                if deps.otp_logging_enabled {
                    warn!(%email, %code, "email dispatch failed; verification code logged instead");
                }
                return Err(error.context("failed to send verification email").into());
            }
            info!(%email, "verification code sent");
        }
        None => {
            if deps.otp_logging_enabled {
                warn!(%email, %code, "mail channel not configured; verification code logged instead");
            }
        }
    }

    Ok(SignupAck {
        message: "OTP sent to email".into(),
    })
}

fn otp_email_body(code: &str) -> String {
    format!(
        "<h2>Email Verification</h2>\n\
         <p>Your OTP code is: <strong>{code}</strong></p>\n\
         <p>This code will expire in 5 minutes.</p>"
    )
}
