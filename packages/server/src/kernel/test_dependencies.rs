// TestDependencies - in-memory implementations for testing
//
// Provides doubles that can be injected into ServerDeps for tests.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domains::auth::models::{NewUser, User};
use crate::domains::notes::Note;
use crate::kernel::traits::{
    BaseIdentityVerifier, BaseMailer, BaseNoteStore, BaseUserStore, CreateUserError,
    VerifiedIdentity,
};

// =============================================================================
// In-memory user store
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseUserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, CreateUserError> {
        // Duplicate check and insert under one lock, like the unique index
        // it stands in for.
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.email == new_user.email) {
            return Err(CreateUserError::Duplicate);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            date_of_birth: new_user.date_of_birth,
            google_id: new_user.google_id,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

// =============================================================================
// In-memory note store
// =============================================================================

#[derive(Default)]
pub struct InMemoryNoteStore {
    notes: Mutex<Vec<Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseNoteStore for InMemoryNoteStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|note| note.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn create(&self, user_id: Uuid, title: &str, content: &str) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_owned(),
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|note| !(note.id == id && note.user_id == user_id));
        Ok(notes.len() < before)
    }
}

// =============================================================================
// Mock mailer
// =============================================================================

/// A sent email captured by `MockMailer`.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Make every send fail, to exercise the dispatch-failure path.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// All emails sent so far.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("mock mailer configured to fail"));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: html_body.to_owned(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock identity verifier
// =============================================================================

pub struct MockIdentityVerifier {
    identity: Option<VerifiedIdentity>,
}

impl MockIdentityVerifier {
    /// Verifier that rejects every assertion.
    pub fn rejecting() -> Self {
        Self { identity: None }
    }

    /// Verifier that accepts any assertion and returns `identity`.
    pub fn with_identity(identity: VerifiedIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }
}

#[async_trait]
impl BaseIdentityVerifier for MockIdentityVerifier {
    async fn verify(&self, _assertion: &str) -> Result<VerifiedIdentity> {
        self.identity
            .clone()
            .ok_or_else(|| anyhow!("assertion rejected"))
    }
}
