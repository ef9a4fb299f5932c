//! Auth endpoints: signup, OTP verification, login, google login
//!
//! Handlers stay thin - each one forwards to the matching domain action.

use axum::extract::State;
use axum::Json;

use crate::common::ApiError;
use crate::domains::auth::actions;
use crate::domains::auth::types::{
    AuthResponse, GoogleLoginRequest, LoginRequest, SignupAck, SignupRequest, VerifyOtpRequest,
};
use crate::server::app::AppState;

pub async fn signup_handler(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupAck>, ApiError> {
    actions::signup(request, &state.deps).await.map(Json)
}

pub async fn verify_otp_handler(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    actions::verify_otp(request, &state.deps).await.map(Json)
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    actions::login(request, &state.deps).await.map(Json)
}

pub async fn google_login_handler(
    State(state): State<AppState>,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    actions::google_login(request, &state.deps).await.map(Json)
}
