// Infrastructure: trait seams, dependency container, external service clients

pub mod deps;
pub mod mailer;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GoogleSignInAdapter, PgNoteStore, PgUserStore, ServerDeps};
pub use mailer::SmtpMailer;
pub use traits::{
    BaseIdentityVerifier, BaseMailer, BaseNoteStore, BaseUserStore, CreateUserError,
    VerifiedIdentity,
};
