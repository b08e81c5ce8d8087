//! Account query endpoints.

use axum::{Json, Router, extract::Path, extract::State, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use remit_core::account::Account;
use remit_core::transfer::{TransactionRecord, TransferOutcome};
use remit_shared::{AccountId, Money, TransactionId};

/// Creates the account query router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}/balance", get(get_balance))
        .route("/accounts/{id}/transactions", get(get_transactions))
}

/// Account snapshot response.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// The account id.
    pub id: i64,
    /// The account holder's name.
    pub holder_name: String,
    /// Current balance.
    pub balance: Money,
    /// Lifecycle status.
    pub status: String,
    /// Timestamp of the last mutation.
    pub last_updated: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id().into_inner(),
            holder_name: account.holder_name().to_string(),
            balance: account.balance(),
            status: account.status().as_str().to_string(),
            last_updated: account.last_updated(),
        }
    }
}

/// Balance-only response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// The account id.
    pub account_id: i64,
    /// Current balance.
    pub balance: Money,
}

/// One history entry.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// The transaction id.
    pub transaction_id: TransactionId,
    /// Debited account.
    pub from_account_id: i64,
    /// Credited account.
    pub to_account_id: i64,
    /// Transferred amount.
    pub amount: Money,
    /// SUCCESS or FAILED.
    pub outcome: TransferOutcome,
    /// Failure message; present iff FAILED.
    pub failure_reason: Option<String>,
    /// Settlement timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            transaction_id: record.id(),
            from_account_id: record.source_id().into_inner(),
            to_account_id: record.destination_id().into_inner(),
            amount: record.amount(),
            outcome: record.outcome(),
            failure_reason: record.failure_reason().map(ToString::to_string),
            created_at: record.created_at(),
        }
    }
}

/// GET /api/v1/accounts/{id} - Account snapshot.
async fn get_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.queries.account_snapshot(AccountId::new(id)).await?;
    Ok(Json(account.into()))
}

/// GET /api/v1/accounts/{id}/balance - Current balance.
async fn get_balance(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.queries.balance(AccountId::new(id)).await?;
    Ok(Json(BalanceResponse {
        account_id: id,
        balance,
    }))
}

/// GET /api/v1/accounts/{id}/transactions - History, newest first.
async fn get_transactions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let history = state.queries.history(AccountId::new(id)).await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}
