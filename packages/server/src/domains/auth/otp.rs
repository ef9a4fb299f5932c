//! Pending-verification ledger for the signup flow.
//!
//! Entries live in process memory only: a restart loses in-flight signups
//! and the user starts the signup over. Known limitation, kept deliberately
//! - entries are worthless five minutes after issuance anyway.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

/// Pending verifications expire this many minutes after issuance.
const OTP_TTL_MINUTES: i64 = 5;

/// Profile fields captured at signup and replayed at account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftProfile {
    pub name: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone)]
struct PendingVerification {
    code: String,
    expires_at: DateTime<Utc>,
    profile: Option<DraftProfile>,
}

/// In-memory ledger mapping normalized email -> pending verification.
///
/// Owned by `ServerDeps` and injected where needed; there is no global
/// instance. At most one entry exists per email - a new signup overwrites
/// any previous pending entry (last write wins, no lock is held between
/// signup attempts).
#[derive(Debug, Default)]
pub struct OtpLedger {
    entries: Mutex<HashMap<String, PendingVerification>>,
}

/// Outcome of attempting to consume a pending verification.
#[derive(Debug)]
pub enum ConsumeOutcome {
    /// Code matched an unexpired entry; the entry is gone now.
    Consumed { profile: Option<DraftProfile> },
    /// Missing entry, wrong code, or expired entry. The three cases are
    /// deliberately indistinguishable to the caller.
    Rejected,
}

impl OtpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh 6-digit code for `email`, overwriting any previous
    /// pending entry. Returns the code for dispatch.
    pub fn issue(&self, email: &str, profile: DraftProfile) -> String {
        let code = generate_code();
        let now = Utc::now();

        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            email.to_owned(),
            PendingVerification {
                code: code.clone(),
                expires_at: now + chrono::Duration::minutes(OTP_TTL_MINUTES),
                profile: Some(profile),
            },
        );
        code
    }

    /// Check `code` against the entry for `email` and remove the entry on
    /// success. Check-and-remove happens under one lock, which is what keeps
    /// account creation at-most-once when verifications race.
    ///
    /// A wrong code leaves the entry in place so the user can retry until it
    /// expires.
    pub fn consume(&self, email: &str, code: &str) -> ConsumeOutcome {
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap();

        let Some(entry) = entries.remove(email) else {
            return ConsumeOutcome::Rejected;
        };
        if entry.expires_at <= now {
            // Expired entries stay removed
            return ConsumeOutcome::Rejected;
        }
        if entry.code != code {
            // Wrong code: put the entry back for another attempt
            entries.insert(email.to_owned(), entry);
            return ConsumeOutcome::Rejected;
        }

        ConsumeOutcome::Consumed {
            profile: entry.profile,
        }
    }
}

/// Uniformly random 6-digit code, 100000-999999.
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
