//! Integration tests for the authentication flows.
//!
//! Drives signup -> verify -> login and the google path end to end over
//! the in-memory dependencies, plus note scoping for an authenticated
//! user.

use std::sync::Arc;

use notes_core::common::ApiError;
use notes_core::domains::auth::actions::{google_login, login, signup, verify_otp};
use notes_core::domains::auth::types::{
    GoogleLoginRequest, LoginRequest, SignupRequest, VerifyOtpRequest,
};
use notes_core::domains::auth::{verify_password, JwtService, OtpLedger};
use notes_core::kernel::test_dependencies::{
    InMemoryNoteStore, InMemoryUserStore, MockIdentityVerifier, MockMailer,
};
use notes_core::kernel::{BaseNoteStore, BaseUserStore, ServerDeps, VerifiedIdentity};

// ============================================================================
// Test Helpers
// ============================================================================

struct TestSetup {
    deps: ServerDeps,
    users: Arc<InMemoryUserStore>,
    mailer: Arc<MockMailer>,
}

fn test_setup() -> TestSetup {
    let users = Arc::new(InMemoryUserStore::new());
    let mailer = Arc::new(MockMailer::new());

    let deps = ServerDeps {
        users: users.clone(),
        notes: Arc::new(InMemoryNoteStore::new()),
        mailer: Some(mailer.clone()),
        identity_verifier: None,
        jwt_service: Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string())),
        otp_ledger: Arc::new(OtpLedger::new()),
        otp_logging_enabled: true,
    };

    TestSetup { deps, users, mailer }
}

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        password: "secret1".to_string(),
        name: "Ann".to_string(),
        date_of_birth: "2000-01-01".to_string(),
    }
}

fn verify_request(email: &str, otp: &str) -> VerifyOtpRequest {
    VerifyOtpRequest {
        email: email.to_string(),
        otp: otp.to_string(),
        password: "secret1".to_string(),
        name: None,
        date_of_birth: None,
    }
}

/// Pull the first run of exactly six digits out of an email body.
fn extract_code(body: &str) -> String {
    let mut run = String::new();
    for ch in body.chars() {
        if ch.is_ascii_digit() {
            run.push(ch);
        } else {
            if run.len() == 6 {
                return run;
            }
            run.clear();
        }
    }
    assert_eq!(run.len(), 6, "no 6-digit code in email body: {body}");
    run
}

fn last_sent_code(mailer: &MockMailer) -> String {
    let sent = mailer.sent();
    let email = sent.last().expect("an email was sent");
    extract_code(&email.body)
}

fn google_identity(email: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        subject: "google-subject-1".to_string(),
        email: Some(email.to_string()),
        email_verified: true,
        name: Some("Ann G".to_string()),
    }
}

// ============================================================================
// Signup + OTP verification
// ============================================================================

#[tokio::test]
async fn test_signup_then_verify_creates_account_and_issues_token() {
    let setup = test_setup();

    let ack = signup(signup_request("A@X.com"), &setup.deps).await.unwrap();
    assert_eq!(ack.message, "OTP sent to email");

    // Code went to the normalized address and the ack leaked nothing
    let sent = setup.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");

    let code = last_sent_code(&setup.mailer);
    let response = verify_otp(verify_request("a@x.com", &code), &setup.deps)
        .await
        .unwrap();

    assert_eq!(response.user.email, "a@x.com");
    assert_eq!(response.user.name, "Ann");

    // The issued token passes the gate's verification
    let claims = setup.deps.jwt_service.verify_token(&response.token).unwrap();
    assert_eq!(claims.user_id, response.user.id);

    // The stored credential is a hash, never the plaintext
    let user = setup.users.find_by_email("a@x.com").await.unwrap().unwrap();
    let hash = user.password_hash.expect("signup accounts carry a hash");
    assert_ne!(hash, "secret1");
    assert!(verify_password("secret1", &hash).await.unwrap());
}

#[tokio::test]
async fn test_verification_consumes_the_entry() {
    let setup = test_setup();

    signup(signup_request("a@x.com"), &setup.deps).await.unwrap();
    let code = last_sent_code(&setup.mailer);

    verify_otp(verify_request("a@x.com", &code), &setup.deps)
        .await
        .unwrap();

    // Same email + code again: the entry is gone
    let err = verify_otp(verify_request("a@x.com", &code), &setup.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Authentication(_)));
    assert_eq!(err.to_string(), "Invalid or expired OTP");
}

#[tokio::test]
async fn test_wrong_code_rejected_with_generic_error() {
    let setup = test_setup();

    signup(signup_request("a@x.com"), &setup.deps).await.unwrap();

    let err = verify_otp(verify_request("a@x.com", "000000"), &setup.deps)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired OTP");

    // Unknown email reads exactly the same
    let err = verify_otp(verify_request("nobody@x.com", "000000"), &setup.deps)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired OTP");
}

#[tokio::test]
async fn test_signup_rejects_existing_account() {
    let setup = test_setup();

    signup(signup_request("a@x.com"), &setup.deps).await.unwrap();
    let code = last_sent_code(&setup.mailer);
    verify_otp(verify_request("a@x.com", &code), &setup.deps)
        .await
        .unwrap();

    let err = signup(signup_request("a@x.com"), &setup.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    assert_eq!(err.to_string(), "User already exists");
}

#[tokio::test]
async fn test_underage_signup_rejected_before_any_code_is_issued() {
    let setup = test_setup();

    let mut request = signup_request("kid@x.com");
    request.date_of_birth = format!("{}-06-15", chrono::Utc::now().format("%Y"));

    let err = signup(request, &setup.deps).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(setup.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_mail_dispatch_failure_fails_the_signup() {
    let mut setup = test_setup();
    setup.deps.mailer = Some(Arc::new(MockMailer::new().with_failure()));

    let err = signup(signup_request("a@x.com"), &setup.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Dependency(_)));
    assert!(setup.users.is_empty());
}

// ============================================================================
// Password login
// ============================================================================

async fn setup_with_account() -> TestSetup {
    let setup = test_setup();
    signup(signup_request("a@x.com"), &setup.deps).await.unwrap();
    let code = last_sent_code(&setup.mailer);
    verify_otp(verify_request("a@x.com", &code), &setup.deps)
        .await
        .unwrap();
    setup
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_login_with_correct_credentials() {
    let setup = setup_with_account().await;

    let response = login(login_request("A@x.com", "secret1"), &setup.deps)
        .await
        .unwrap();
    assert_eq!(response.user.email, "a@x.com");

    let claims = setup.deps.jwt_service.verify_token(&response.token).unwrap();
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let setup = setup_with_account().await;

    // Federation-only account: present, but no password hash
    setup
        .users
        .create(notes_core::domains::auth::models::NewUser {
            email: "fed@x.com".to_string(),
            password_hash: None,
            name: "Fed".to_string(),
            date_of_birth: None,
            google_id: Some("google-subject-9".to_string()),
        })
        .await
        .unwrap();

    let wrong_password = login(login_request("a@x.com", "wrong!!"), &setup.deps)
        .await
        .unwrap_err();
    let unknown_email = login(login_request("ghost@x.com", "secret1"), &setup.deps)
        .await
        .unwrap_err();
    let federation_only = login(login_request("fed@x.com", "secret1"), &setup.deps)
        .await
        .unwrap_err();

    for err in [&wrong_password, &unknown_email, &federation_only] {
        assert!(matches!(err, ApiError::Authentication(_)));
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let setup = test_setup();

    let err = login(login_request("a@x.com", ""), &setup.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.to_string(), "Email and password are required");
}

// ============================================================================
// Google login
// ============================================================================

#[tokio::test]
async fn test_google_login_requires_configuration() {
    let setup = test_setup();

    let request = GoogleLoginRequest {
        token: "some-token".to_string(),
    };
    let err = google_login(request, &setup.deps).await.unwrap_err();
    assert!(matches!(err, ApiError::Configuration(_)));
    assert_eq!(err.to_string(), "Google authentication not configured");
}

#[tokio::test]
async fn test_google_login_creates_passwordless_account() {
    let mut setup = test_setup();
    setup.deps.identity_verifier = Some(Arc::new(MockIdentityVerifier::with_identity(
        google_identity("Ann@X.com"),
    )));

    let request = GoogleLoginRequest {
        token: "id-token".to_string(),
    };
    let response = google_login(request, &setup.deps).await.unwrap();
    assert_eq!(response.user.email, "ann@x.com");
    assert_eq!(response.user.name, "Ann G");

    let user = setup
        .users
        .find_by_email("ann@x.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.password_hash.is_none());
    assert_eq!(user.google_id.as_deref(), Some("google-subject-1"));
}

#[tokio::test]
async fn test_google_login_without_verified_email_creates_nothing() {
    let mut setup = test_setup();
    let mut identity = google_identity("ann@x.com");
    identity.email_verified = false;
    setup.deps.identity_verifier = Some(Arc::new(MockIdentityVerifier::with_identity(identity)));

    let request = GoogleLoginRequest {
        token: "id-token".to_string(),
    };
    let err = google_login(request, &setup.deps).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid Google token");
    assert!(setup.users.is_empty());
}

#[tokio::test]
async fn test_google_login_with_missing_email_creates_nothing() {
    let mut setup = test_setup();
    let mut identity = google_identity("ann@x.com");
    identity.email = None;
    setup.deps.identity_verifier = Some(Arc::new(MockIdentityVerifier::with_identity(identity)));

    let request = GoogleLoginRequest {
        token: "id-token".to_string(),
    };
    let err = google_login(request, &setup.deps).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid Google token");
    assert!(setup.users.is_empty());
}

#[tokio::test]
async fn test_google_login_rejected_assertion() {
    let mut setup = test_setup();
    setup.deps.identity_verifier = Some(Arc::new(MockIdentityVerifier::rejecting()));

    let request = GoogleLoginRequest {
        token: "forged-token".to_string(),
    };
    let err = google_login(request, &setup.deps).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid Google token");
}

#[tokio::test]
async fn test_google_login_merges_into_password_account_by_email() {
    let mut setup = setup_with_account().await;
    setup.deps.identity_verifier = Some(Arc::new(MockIdentityVerifier::with_identity(
        google_identity("a@x.com"),
    )));

    let existing = setup.users.find_by_email("a@x.com").await.unwrap().unwrap();

    let request = GoogleLoginRequest {
        token: "id-token".to_string(),
    };
    let response = google_login(request, &setup.deps).await.unwrap();

    // Same account, and the stored password hash is untouched
    assert_eq!(response.user.id, existing.id);
    let after = setup.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(after.password_hash, existing.password_hash);
    assert_eq!(setup.users.len(), 1);
}

// ============================================================================
// Notes are scoped to the authenticated owner
// ============================================================================

#[tokio::test]
async fn test_notes_are_scoped_to_their_owner() {
    let setup = test_setup();
    let notes = &setup.deps.notes;

    let ann = uuid::Uuid::new_v4();
    let bob = uuid::Uuid::new_v4();

    let first = notes.create(ann, "first", "note one").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = notes.create(ann, "second", "note two").await.unwrap();
    notes.create(bob, "bob's", "other account").await.unwrap();

    let listed = notes.list_for_user(ann).await.unwrap();
    assert_eq!(listed.len(), 2);
    // Newest first
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);

    // Bob cannot delete Ann's note
    assert!(!notes.delete_owned(first.id, bob).await.unwrap());
    assert!(notes.delete_owned(first.id, ann).await.unwrap());
    assert_eq!(notes.list_for_user(ann).await.unwrap().len(), 1);
}
