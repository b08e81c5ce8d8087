//! Transfer request and receipt types.

use remit_shared::{AccountId, Money, TransactionId};

use super::error::TransferError;
use super::record::{TransactionRecord, TransferOutcome};

/// A validated transfer request.
///
/// Construction rejects self-transfers, non-positive amounts, and blank
/// idempotency keys, so an instance is always structurally sound before
/// it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Account to debit.
    pub source_id: AccountId,
    /// Account to credit.
    pub destination_id: AccountId,
    /// Amount to move; strictly positive.
    pub amount: Money,
    /// Caller-supplied token guaranteeing at-most-once execution.
    pub idempotency_key: String,
}

impl TransferRequest {
    /// Builds a request, enforcing the structural rules.
    ///
    /// # Errors
    ///
    /// - `SameAccount` if source and destination are identical
    /// - `InvalidAmount` if the amount is zero or negative
    /// - `MissingIdempotencyKey` if the key is blank
    pub fn new(
        source_id: AccountId,
        destination_id: AccountId,
        amount: Money,
        idempotency_key: impl Into<String>,
    ) -> Result<Self, TransferError> {
        if source_id == destination_id {
            return Err(TransferError::SameAccount);
        }
        if !amount.is_positive() {
            return Err(TransferError::InvalidAmount);
        }
        let idempotency_key = idempotency_key.into();
        if idempotency_key.trim().is_empty() {
            return Err(TransferError::MissingIdempotencyKey);
        }

        Ok(Self {
            source_id,
            destination_id,
            amount,
            idempotency_key,
        })
    }
}

/// Outcome of a settled transfer, as observed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    /// Id of the transaction record backing this receipt.
    pub transaction_id: TransactionId,
    /// SUCCESS or FAILED.
    pub outcome: TransferOutcome,
    /// Human-readable outcome message.
    pub message: String,
    /// Debited account.
    pub source_id: AccountId,
    /// Credited account.
    pub destination_id: AccountId,
    /// Transferred amount.
    pub amount: Money,
    /// True when this receipt replays a previously settled outcome for
    /// the same idempotency key instead of a fresh execution.
    pub replayed: bool,
}

impl TransferReceipt {
    /// Builds a receipt from a settled record.
    #[must_use]
    pub fn from_record(record: &TransactionRecord, replayed: bool) -> Self {
        let message = match record.outcome() {
            TransferOutcome::Success => "Transfer completed successfully".to_string(),
            TransferOutcome::Failed => record
                .failure_reason()
                .unwrap_or("Transfer failed")
                .to_string(),
        };

        Self {
            transaction_id: record.id(),
            outcome: record.outcome(),
            message,
            source_id: record.source_id(),
            destination_id: record.destination_id(),
            amount: record.amount(),
            replayed,
        }
    }

    /// Returns true for a SUCCESS receipt.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
