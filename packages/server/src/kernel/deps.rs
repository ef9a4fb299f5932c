//! Server dependencies (using traits for testability)
//!
//! Central dependency container handed to domain actions. External
//! collaborators - credential store, note store, mail channel, identity
//! provider - are trait objects so tests can swap in in-memory doubles.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use google_signin::GoogleSignInService;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::auth::models::{NewUser, User};
use crate::domains::auth::{JwtService, OtpLedger};
use crate::domains::notes::Note;
use crate::kernel::traits::{
    BaseIdentityVerifier, BaseMailer, BaseNoteStore, BaseUserStore, CreateUserError,
    VerifiedIdentity,
};

// =============================================================================
// Postgres store adapters (implement Base* traits over models/ queries)
// =============================================================================

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseUserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        User::find_by_email(email, &self.pool).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, CreateUserError> {
        User::insert(&new_user, &self.pool).await.map_err(|e| {
            if let sqlx::Error::Database(db_error) = &e {
                if db_error.is_unique_violation() {
                    return CreateUserError::Duplicate;
                }
            }
            CreateUserError::Other(e.into())
        })
    }
}

pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseNoteStore for PgNoteStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Note>> {
        Note::find_for_user(user_id, &self.pool).await
    }

    async fn create(&self, user_id: Uuid, title: &str, content: &str) -> Result<Note> {
        Note::create(user_id, title, content, &self.pool).await
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        Note::delete_owned(id, user_id, &self.pool).await
    }
}

// =============================================================================
// GoogleSignInService Adapter (implements BaseIdentityVerifier trait)
// =============================================================================

/// Wrapper around GoogleSignInService that implements BaseIdentityVerifier
pub struct GoogleSignInAdapter(pub Arc<GoogleSignInService>);

impl GoogleSignInAdapter {
    pub fn new(service: Arc<GoogleSignInService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseIdentityVerifier for GoogleSignInAdapter {
    async fn verify(&self, assertion: &str) -> Result<VerifiedIdentity> {
        let claims = self
            .0
            .verify_id_token(assertion)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(VerifiedIdentity {
            subject: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified.unwrap_or(false),
            name: claims.name,
        })
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub users: Arc<dyn BaseUserStore>,
    pub notes: Arc<dyn BaseNoteStore>,
    /// Outbound mail channel; `None` switches signup to the diagnostic
    /// code-logging fallback.
    pub mailer: Option<Arc<dyn BaseMailer>>,
    /// Federated login verifier; `None` disables the google endpoint.
    pub identity_verifier: Option<Arc<dyn BaseIdentityVerifier>>,
    /// Session token service
    pub jwt_service: Arc<JwtService>,
    /// Pending-verification ledger for the signup flow
    pub otp_ledger: Arc<OtpLedger>,
    /// Log issued codes when the mail channel is unconfigured. Off in
    /// production.
    pub otp_logging_enabled: bool,
}
