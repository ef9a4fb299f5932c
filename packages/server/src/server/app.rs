//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use google_signin::{GoogleSignInOptions, GoogleSignInService};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::{JwtService, OtpLedger};
use crate::kernel::{
    BaseIdentityVerifier, BaseMailer, GoogleSignInAdapter, PgNoteStore, PgUserStore, ServerDeps,
    SmtpMailer,
};
use crate::server::middleware::require_auth;
use crate::server::routes::{
    create_note_handler, delete_note_handler, google_login_handler, health_handler,
    list_notes_handler, login_handler, signup_handler, verify_otp_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Assemble server dependencies from configuration.
///
/// The mail channel and google verifier stay `None` when unconfigured:
/// signup falls back to code logging, and the google endpoint reports a
/// configuration error.
pub fn build_deps(pool: PgPool, config: &Config) -> anyhow::Result<ServerDeps> {
    let mailer: Option<Arc<dyn BaseMailer>> = match (&config.email_user, &config.email_pass) {
        (Some(user), Some(pass)) => {
            Some(Arc::new(SmtpMailer::new(&config.smtp_host, user, pass)?))
        }
        _ => {
            tracing::warn!(
                "EMAIL_USER/EMAIL_PASS not set; verification codes will only be logged"
            );
            None
        }
    };

    let identity_verifier: Option<Arc<dyn BaseIdentityVerifier>> =
        config.google_client_id.clone().map(|client_id| {
            let service = Arc::new(GoogleSignInService::new(GoogleSignInOptions { client_id }));
            Arc::new(GoogleSignInAdapter::new(service)) as Arc<dyn BaseIdentityVerifier>
        });

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
    ));

    Ok(ServerDeps {
        users: Arc::new(PgUserStore::new(pool.clone())),
        notes: Arc::new(PgNoteStore::new(pool)),
        mailer,
        identity_verifier,
        jwt_service,
        otp_ledger: Arc::new(OtpLedger::new()),
        otp_logging_enabled: !config.is_production(),
    })
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, deps: Arc<ServerDeps>) -> Router {
    let state = AppState { db_pool: pool, deps };

    // CORS configuration - Authorization must be allowed for bearer tokens
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Note operations sit behind the access gate
    let notes_routes = Router::new()
        .route("/", get(list_notes_handler).post(create_note_handler))
        .route("/:id", delete(delete_note_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/verify-otp", post(verify_otp_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/google", post(google_login_handler))
        .nest("/api/notes", notes_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .with_state(state)
}
