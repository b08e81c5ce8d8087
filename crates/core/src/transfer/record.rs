//! Immutable transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remit_shared::{AccountId, Money, TransactionId};

/// Settled outcome of a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferOutcome {
    /// Funds moved.
    Success,
    /// A business rule blocked execution; nothing moved.
    Failed,
}

impl TransferOutcome {
    /// Returns the canonical uppercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    /// Returns true for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransferOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("Unknown transfer outcome: {s}")),
        }
    }
}

/// Append-only record of one settled transfer attempt.
///
/// Constructed fully before the single insert and never mutated afterward:
/// there are no setters, and the outcome and failure reason are fixed at
/// construction. The idempotency key is unique across all records; the
/// store enforces that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    id: TransactionId,
    source_id: AccountId,
    destination_id: AccountId,
    amount: Money,
    outcome: TransferOutcome,
    failure_reason: Option<String>,
    idempotency_key: String,
    created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Creates a SUCCESS record.
    #[must_use]
    pub fn success(
        source_id: AccountId,
        destination_id: AccountId,
        amount: Money,
        idempotency_key: String,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            source_id,
            destination_id,
            amount,
            outcome: TransferOutcome::Success,
            failure_reason: None,
            idempotency_key,
            created_at: Utc::now(),
        }
    }

    /// Creates a FAILED record carrying the failure message.
    #[must_use]
    pub fn failed(
        source_id: AccountId,
        destination_id: AccountId,
        amount: Money,
        idempotency_key: String,
        failure_reason: String,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            source_id,
            destination_id,
            amount,
            outcome: TransferOutcome::Failed,
            failure_reason: Some(failure_reason),
            idempotency_key,
            created_at: Utc::now(),
        }
    }

    /// Reconstructs a record from stored state.
    #[must_use]
    pub const fn from_parts(
        id: TransactionId,
        source_id: AccountId,
        destination_id: AccountId,
        amount: Money,
        outcome: TransferOutcome,
        failure_reason: Option<String>,
        idempotency_key: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            source_id,
            destination_id,
            amount,
            outcome,
            failure_reason,
            idempotency_key,
            created_at,
        }
    }

    /// Globally unique transaction id.
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    /// Debited account.
    #[must_use]
    pub const fn source_id(&self) -> AccountId {
        self.source_id
    }

    /// Credited account.
    #[must_use]
    pub const fn destination_id(&self) -> AccountId {
        self.destination_id
    }

    /// Transferred amount; always positive.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Settled outcome.
    #[must_use]
    pub const fn outcome(&self) -> TransferOutcome {
        self.outcome
    }

    /// Failure message; present iff the outcome is FAILED.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Caller-supplied idempotency key.
    #[must_use]
    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_success_record_has_no_failure_reason() {
        let record = TransactionRecord::success(
            AccountId::new(1),
            AccountId::new(2),
            Money::new(dec!(50.00)),
            "k1".to_string(),
        );

        assert_eq!(record.outcome(), TransferOutcome::Success);
        assert!(record.failure_reason().is_none());
        assert_eq!(record.idempotency_key(), "k1");
    }

    #[test]
    fn test_failed_record_carries_reason() {
        let record = TransactionRecord::failed(
            AccountId::new(1),
            AccountId::new(2),
            Money::new(dec!(50.00)),
            "k2".to_string(),
            "insufficient balance".to_string(),
        );

        assert_eq!(record.outcome(), TransferOutcome::Failed);
        assert_eq!(record.failure_reason(), Some("insufficient balance"));
    }

    #[test]
    fn test_records_get_distinct_ids() {
        let a = TransactionRecord::success(
            AccountId::new(1),
            AccountId::new(2),
            Money::new(dec!(1.00)),
            "a".to_string(),
        );
        let b = TransactionRecord::success(
            AccountId::new(1),
            AccountId::new(2),
            Money::new(dec!(1.00)),
            "b".to_string(),
        );
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_outcome_parse_roundtrip() {
        use std::str::FromStr;

        assert_eq!(
            TransferOutcome::from_str("SUCCESS").unwrap(),
            TransferOutcome::Success
        );
        assert_eq!(
            TransferOutcome::from_str("failed").unwrap(),
            TransferOutcome::Failed
        );
        assert!(TransferOutcome::from_str("PENDING").is_err());
    }
}
