//! Error types for the transfer protocol.

use thiserror::Error;

use remit_shared::{AccountId, AppError};

use crate::store::StoreError;

/// Failures surfaced by the transfer engine.
///
/// Everything here is an *unrecorded* rejection or an infrastructure
/// condition: business-rule failures discovered during execution are not
/// errors, they settle as FAILED receipts. A caller receiving any of the
/// gate/validation variants may retry with the same idempotency key once
/// the underlying condition is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The authenticated principal is not the source account holder.
    #[error("you are not authorized to transfer from this account")]
    Forbidden,

    /// Source and destination are the same account.
    #[error("source and destination accounts must differ")]
    SameAccount,

    /// Amount was absent, zero, or negative.
    #[error("transfer amount must be greater than zero")]
    InvalidAmount,

    /// Idempotency key was blank.
    #[error("an idempotency key is required")]
    MissingIdempotencyKey,

    /// One of the accounts does not exist.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// One of the accounts is locked or closed.
    #[error("account {0} is not active")]
    AccountNotActive(AccountId),

    /// The optimistic-retry budget was exhausted without reaching a
    /// definitive business outcome. Nothing was recorded; safe to retry
    /// with the same key.
    #[error("transfer could not be completed due to concurrent updates; retry")]
    TransientFailure,

    /// Store infrastructure failure. Nothing was recorded.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TransferError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Forbidden => Self::Forbidden(err.to_string()),
            TransferError::SameAccount
            | TransferError::InvalidAmount
            | TransferError::MissingIdempotencyKey => Self::Validation(err.to_string()),
            TransferError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            TransferError::AccountNotActive(_) => Self::BusinessRule(err.to_string()),
            TransferError::TransientFailure => Self::Unavailable(err.to_string()),
            TransferError::Store(store) => match store {
                StoreError::NotFound => Self::NotFound(store.to_string()),
                StoreError::Unavailable(_) => Self::Unavailable(store.to_string()),
                StoreError::VersionConflict | StoreError::DuplicateKey => {
                    Self::Database(store.to_string())
                }
            },
        }
    }
}
