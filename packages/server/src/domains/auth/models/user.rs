use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account.
///
/// `password_hash` is absent for federation-only accounts (Google login
/// with no prior signup). `date_of_birth` is only collected on the signup
/// path. Exactly one account exists per lowercased email - the unique
/// index on `email` enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for account creation. `email` must already be normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub google_id: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    /// Find a user by normalized email.
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a new user. Fails with a database unique violation when the
    /// email is taken; the raw error is returned so the caller can tell
    /// that case apart.
    pub async fn insert(new_user: &NewUser, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (email, password_hash, name, date_of_birth, google_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.name)
        .bind(new_user.date_of_birth)
        .bind(&new_user.google_id)
        .fetch_one(pool)
        .await
    }
}
