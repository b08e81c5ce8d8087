//! Transfer endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use remit_core::transfer::{TransferOutcome, TransferReceipt, TransferRequest};
use remit_shared::{AccountId, AppError, Money, TransactionId};

/// Creates the transfer router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfers", post(create_transfer))
}

/// Transfer request payload.
#[derive(Debug, Deserialize, Validate)]
pub struct TransferPayload {
    /// Account to debit; must be the authenticated principal's account.
    pub from_account_id: i64,
    /// Account to credit.
    pub to_account_id: i64,
    /// Amount to move.
    pub amount: Decimal,
    /// Caller-supplied at-most-once token.
    #[validate(length(min = 1, max = 255, message = "idempotency_key must be 1-255 characters"))]
    pub idempotency_key: String,
}

/// Settled transfer as returned to the caller.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Id of the backing transaction record.
    pub transaction_id: TransactionId,
    /// SUCCESS or FAILED.
    pub outcome: TransferOutcome,
    /// Human-readable outcome message.
    pub message: String,
    /// Debited account.
    pub from_account_id: i64,
    /// Credited account.
    pub to_account_id: i64,
    /// Transferred amount.
    pub amount: Money,
    /// True when this is a replay of a previously settled outcome.
    pub replayed: bool,
}

impl From<TransferReceipt> for TransferResponse {
    fn from(receipt: TransferReceipt) -> Self {
        Self {
            transaction_id: receipt.transaction_id,
            outcome: receipt.outcome,
            message: receipt.message,
            from_account_id: receipt.source_id.into_inner(),
            to_account_id: receipt.destination_id.into_inner(),
            amount: receipt.amount,
            replayed: receipt.replayed,
        }
    }
}

/// POST /api/v1/transfers - Execute an idempotent transfer.
///
/// Fresh settlements (SUCCESS or FAILED) return 201; replays of a settled
/// idempotency key return 200 with `replayed: true`.
async fn create_transfer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TransferPayload>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let request = TransferRequest::new(
        AccountId::new(payload.from_account_id),
        AccountId::new(payload.to_account_id),
        Money::new(payload.amount),
        payload.idempotency_key,
    )?;

    let receipt = state.engine.transfer(user.account_id(), &request).await?;
    let status = if receipt.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status, Json(receipt.into())))
}
