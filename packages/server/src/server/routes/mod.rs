// HTTP routes
pub mod auth;
pub mod health;
pub mod notes;

pub use auth::*;
pub use health::*;
pub use notes::*;
