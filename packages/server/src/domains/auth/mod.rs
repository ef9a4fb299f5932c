//! Auth domain - OTP-verified signup, password login, Google Sign-In
//!
//! Responsibilities:
//! - Email signup with OTP verification (pending ledger + mail dispatch)
//! - Password hashing and login
//! - Google ID-token login
//! - Session token (JWT) management

pub mod actions;
pub mod jwt;
pub mod models;
pub mod otp;
pub mod password;
pub mod types;
pub mod validate;

pub use jwt::{Claims, JwtService};
pub use otp::{ConsumeOutcome, DraftProfile, OtpLedger};
pub use password::{hash_password, verify_password};
