use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;
use uuid::Uuid;

use crate::common::ApiError;
use crate::domains::auth::JwtService;
use crate::server::app::AppState;

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// JWT authentication middleware - the access gate for note operations.
///
/// Extracts the bearer token from the Authorization header and verifies it.
/// A valid token gets an `AuthUser` added to request extensions; a missing,
/// malformed, forged, or expired token is rejected before any handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match extract_auth_user(&request, &state.deps.jwt_service) {
        Some(user) => {
            debug!(user_id = %user.user_id, "authenticated request");
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        None => Err(ApiError::Authentication("Invalid or expired token".into())),
    }
}

/// Extract and verify the JWT from a request
fn extract_auth_user(request: &Request, jwt_service: &JwtService) -> Option<AuthUser> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token
    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
    })
}
