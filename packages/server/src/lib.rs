// Notes API - core library
//
// Backend for a minimal personal note-taking service. Users sign up with
// email + OTP verification (or Google Sign-In) and manage notes scoped to
// their account. External collaborators - credential store, mail channel,
// identity provider - sit behind trait seams in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
