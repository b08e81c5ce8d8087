//! Read-side facade over the store.
//!
//! Queries read committed state only; there is no read-your-own-write
//! coupling with the transfer engine beyond what the store provides.

use std::sync::Arc;

use remit_shared::{AccountId, Money};

use crate::account::Account;
use crate::store::{StoreError, TransferStore};
use crate::transfer::TransactionRecord;

/// Read-only account and history lookups.
#[derive(Clone)]
pub struct AccountQueries {
    store: Arc<dyn TransferStore>,
}

impl AccountQueries {
    /// Creates the facade over a store.
    #[must_use]
    pub fn new(store: Arc<dyn TransferStore>) -> Self {
        Self { store }
    }

    /// Full account snapshot.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the account does not exist.
    pub async fn account_snapshot(&self, id: AccountId) -> Result<Account, StoreError> {
        self.store.get(id).await
    }

    /// Current balance only.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the account does not exist.
    pub async fn balance(&self, id: AccountId) -> Result<Money, StoreError> {
        Ok(self.store.get(id).await?.balance())
    }

    /// Transaction history where the account is source or destination,
    /// newest first. The account must exist; an empty history is a valid
    /// answer for a fresh account.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the account does not exist.
    pub async fn history(&self, id: AccountId) -> Result<Vec<TransactionRecord>, StoreError> {
        self.store.get(id).await?;
        self.store.find_by_account(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::account::AccountStatus;
    use crate::store::MemoryStore;
    use crate::transfer::{TransferEngine, TransferRequest};

    async fn seeded() -> (AccountQueries, TransferEngine, Account, Account) {
        let store = Arc::new(MemoryStore::new());
        let source = store.create_account(
            "Pranav",
            Money::new(dec!(1000.00)),
            AccountStatus::Active,
            "h",
        );
        let destination = store.create_account(
            "Pranesh",
            Money::new(dec!(500.00)),
            AccountStatus::Active,
            "h",
        );
        let queries = AccountQueries::new(store.clone());
        let engine = TransferEngine::new(store);
        (queries, engine, source, destination)
    }

    #[tokio::test]
    async fn test_snapshot_and_balance() {
        let (queries, _engine, source, _destination) = seeded().await;

        let snapshot = queries.account_snapshot(source.id()).await.unwrap();
        assert_eq!(snapshot.holder_name(), "Pranav");
        assert_eq!(
            queries.balance(source.id()).await.unwrap(),
            Money::new(dec!(1000.00))
        );
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let (queries, _engine, _source, _destination) = seeded().await;

        let err = queries.balance(AccountId::new(99)).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound);
        let err = queries.history(AccountId::new(99)).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn test_history_covers_both_directions() {
        let (queries, engine, source, destination) = seeded().await;

        let out = TransferRequest::new(
            source.id(),
            destination.id(),
            Money::new(dec!(100.00)),
            "k1",
        )
        .unwrap();
        engine.transfer(source.id(), &out).await.unwrap();

        let back = TransferRequest::new(
            destination.id(),
            source.id(),
            Money::new(dec!(25.00)),
            "k2",
        )
        .unwrap();
        engine.transfer(destination.id(), &back).await.unwrap();

        let history = queries.history(source.id()).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().any(|r| r.source_id() == source.id()));
        assert!(history.iter().any(|r| r.destination_id() == source.id()));
    }

    #[tokio::test]
    async fn test_fresh_account_has_empty_history() {
        let store = Arc::new(MemoryStore::new());
        let account =
            store.create_account("Pradeep", Money::new(dec!(0.00)), AccountStatus::Active, "h");
        let queries = AccountQueries::new(store);

        assert!(queries.history(account.id()).await.unwrap().is_empty());
    }
}
