//! Auth domain actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP handlers.

mod google_login;
mod login;
mod signup;
mod verify_otp;

pub use google_login::google_login;
pub use login::login;
pub use signup::signup;
pub use verify_otp::verify_otp;
