//! Signup input validation.
//!
//! Checks run in a fixed order and the first failure wins, so callers get
//! one field-level message at a time.

use chrono::{Datelike, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::common::ApiError;
use crate::domains::auth::types::SignupRequest;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Minimum account age in calendar years. The check subtracts years only -
/// a known-imprecise business rule kept as-is.
const MIN_AGE_YEARS: i32 = 13;

/// Signup input after validation.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub email: String,
    pub password: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
}

/// Lowercase an email for use as the account key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parse an ISO `YYYY-MM-DD` date of birth.
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Validate a signup request, reporting the first failing check.
pub fn validate_signup(request: &SignupRequest) -> Result<ValidSignup, ApiError> {
    if request.email.is_empty()
        || request.password.is_empty()
        || request.name.is_empty()
        || request.date_of_birth.is_empty()
    {
        return Err(ApiError::Validation("All fields are required".into()));
    }

    if !EMAIL_RE.is_match(&request.email) {
        return Err(ApiError::Validation("Invalid email format".into()));
    }

    if request.password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    if request.name.trim().chars().count() < 2 {
        return Err(ApiError::Validation(
            "Name must be at least 2 characters".into(),
        ));
    }

    let date_of_birth = parse_date_of_birth(&request.date_of_birth)
        .ok_or_else(|| ApiError::Validation("Invalid date of birth".into()))?;

    let age = Utc::now().year() - date_of_birth.year();
    if age < MIN_AGE_YEARS {
        return Err(ApiError::Validation("Must be at least 13 years old".into()));
    }

    Ok(ValidSignup {
        email: request.email.clone(),
        password: request.password.clone(),
        name: request.name.clone(),
        date_of_birth,
    })
}
