// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseMailer, BaseUserStore)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domains::auth::models::{NewUser, User};
use crate::domains::notes::Note;

// =============================================================================
// Credential Store Trait (Infrastructure - account persistence)
// =============================================================================

/// Duplicate-key gets its own error kind: account creation must stay
/// at-most-once per email even when flows race, and callers decide how to
/// surface the collision.
#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("user already exists")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BaseUserStore: Send + Sync {
    /// Look up an account by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create an account. `Duplicate` when the email is already taken.
    async fn create(&self, new_user: NewUser) -> Result<User, CreateUserError>;
}

// =============================================================================
// Note Store Trait (Infrastructure - note persistence)
// =============================================================================

#[async_trait]
pub trait BaseNoteStore: Send + Sync {
    /// All notes owned by a user, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Note>>;

    async fn create(&self, user_id: Uuid, title: &str, content: &str) -> Result<Note>;

    /// Delete a note only if `user_id` owns it. Returns whether it existed.
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

// =============================================================================
// Mailer Trait (Infrastructure - outbound email)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Send a single HTML email.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

// =============================================================================
// Identity Verifier Trait (Infrastructure - federated login)
// =============================================================================

/// Claims extracted from a verified third-party identity assertion.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Provider-scoped subject identifier.
    pub subject: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
}

#[async_trait]
pub trait BaseIdentityVerifier: Send + Sync {
    /// Verify a provider-issued identity assertion (signature + audience)
    /// and return its claims.
    async fn verify(&self, assertion: &str) -> Result<VerifiedIdentity>;
}
