//! Error types for account mutations.

use remit_shared::{AccountId, Money};
use thiserror::Error;

use super::AccountStatus;

/// Business-rule violations raised by `debit`/`credit`.
///
/// These are normal, loggable outcomes when they occur during transfer
/// execution; the transfer engine records them as FAILED transaction
/// records rather than surfacing them as system errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Amount was zero or negative.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// Account is locked or closed.
    #[error("account {0} is not active (status {1})")]
    NotActive(AccountId, AccountStatus),

    /// Balance does not cover the requested debit.
    #[error("insufficient balance in account {account}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// The account whose balance fell short.
        account: AccountId,
        /// Balance at the time of the check.
        balance: Money,
        /// Amount the debit asked for.
        requested: Money,
    },
}
