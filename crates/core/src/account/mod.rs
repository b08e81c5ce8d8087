//! Ledger account entity and mutation rules.
//!
//! An account is the ledger entity of the system: its balance must never go
//! negative and it can only be mutated while `Active`. Every successful
//! mutation advances the optimistic version counter by exactly one; the
//! store rejects writes whose version does not line up, which is what
//! serializes concurrent transfers touching the same account.

mod error;

pub use error::AccountError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remit_shared::{AccountId, Money};

/// Lifecycle status of an account.
///
/// Accounts are never physically deleted; they transition to `Locked` or
/// `Closed` instead. Only `Active` accounts accept debits and credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    /// Account is operational.
    Active,
    /// Account is temporarily suspended.
    Locked,
    /// Account is permanently closed.
    Closed,
}

impl AccountStatus {
    /// Returns the canonical uppercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Locked => "LOCKED",
            Self::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "LOCKED" => Ok(Self::Locked),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(format!("Unknown account status: {s}")),
        }
    }
}

/// A mutable ledger account.
///
/// Side effects of `debit`/`credit` are confined to the in-memory instance;
/// durability is the account store's responsibility. On any rule violation
/// the instance is left untouched (no partial effect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    holder_name: String,
    balance: Money,
    status: AccountStatus,
    version: i64,
    last_updated: DateTime<Utc>,
}

impl Account {
    /// Creates a freshly provisioned account at version 0.
    #[must_use]
    pub fn new(id: AccountId, holder_name: String, balance: Money, status: AccountStatus) -> Self {
        Self {
            id,
            holder_name,
            balance,
            status,
            version: 0,
            last_updated: Utc::now(),
        }
    }

    /// Reconstructs an account from stored state.
    #[must_use]
    pub const fn from_parts(
        id: AccountId,
        holder_name: String,
        balance: Money,
        status: AccountStatus,
        version: i64,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            holder_name,
            balance,
            status,
            version,
            last_updated,
        }
    }

    /// Reduces the balance by `amount`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `NotActive` if the account is locked or closed
    /// - `InsufficientBalance` if the balance does not cover `amount`
    pub fn debit(&mut self, amount: Money) -> Result<(), AccountError> {
        self.check_amount(amount)?;
        self.check_active()?;
        if self.balance < amount {
            return Err(AccountError::InsufficientBalance {
                account: self.id,
                balance: self.balance,
                requested: amount,
            });
        }

        self.balance = self.balance.subtract(amount);
        self.touch();
        Ok(())
    }

    /// Increases the balance by `amount`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `NotActive` if the account is locked or closed
    pub fn credit(&mut self, amount: Money) -> Result<(), AccountError> {
        self.check_amount(amount)?;
        self.check_active()?;

        self.balance = self.balance.add(amount);
        self.touch();
        Ok(())
    }

    /// Returns true if the account accepts mutations.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    fn check_amount(&self, amount: Money) -> Result<(), AccountError> {
        if amount.is_positive() {
            Ok(())
        } else {
            Err(AccountError::InvalidAmount)
        }
    }

    fn check_active(&self) -> Result<(), AccountError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(AccountError::NotActive(self.id, self.status))
        }
    }

    // Every successful mutation advances the version by exactly 1 and
    // refreshes the timestamp.
    fn touch(&mut self) {
        self.version += 1;
        self.last_updated = Utc::now();
    }

    /// The store-assigned account id.
    #[must_use]
    pub const fn id(&self) -> AccountId {
        self.id
    }

    /// The account holder's name.
    #[must_use]
    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    /// The current balance. Never negative.
    #[must_use]
    pub const fn balance(&self) -> Money {
        self.balance
    }

    /// The lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AccountStatus {
        self.status
    }

    /// The optimistic version counter.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Timestamp of the last successful mutation.
    #[must_use]
    pub const fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

#[cfg(test)]
mod props;
