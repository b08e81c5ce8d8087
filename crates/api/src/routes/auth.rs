//! Authentication route for account login.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::error::ApiError;
use crate::AppState;
use remit_shared::{AccountId, AppError};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Login request payload.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// The account to authenticate as.
    pub account_id: i64,
    /// The account password.
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated account id.
    pub account_id: i64,
    /// The account holder's name.
    pub holder_name: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /api/auth/login - Authenticate an account and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let account = state
        .authenticator
        .verify_credentials(AccountId::new(payload.account_id), &payload.password)
        .await?;

    let token = state
        .jwt_service
        .generate_access_token(account.id())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(account = %account.id(), "account logged in");

    Ok(Json(LoginResponse {
        token,
        account_id: account.id().into_inner(),
        holder_name: account.holder_name().to_string(),
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}
