//! In-memory store backed by a single mutex.
//!
//! Used by the test suite and as the server's fallback when no database is
//! configured. One lock guards all state, so `commit_transfer` is trivially
//! atomic: both version checks, both writes, and the record insert happen
//! inside a single critical section.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use remit_shared::{AccountId, Money};

use crate::account::{Account, AccountStatus};
use crate::transfer::TransactionRecord;

use super::{AccountStore, StoreError, TransactionLogStore, TransferStore};

struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<i64, StoredAccount>,
    records: Vec<TransactionRecord>,
    next_id: i64,
}

/// Mutex-guarded store holding accounts and the transaction log in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions an account with a store-assigned sequential id.
    pub fn create_account(
        &self,
        holder_name: impl Into<String>,
        balance: Money,
        status: AccountStatus,
        password_hash: impl Into<String>,
    ) -> Account {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = AccountId::new(inner.next_id);
        let account = Account::new(id, holder_name.into(), balance, status);
        inner.accounts.insert(
            id.into_inner(),
            StoredAccount {
                account: account.clone(),
                password_hash: password_hash.into(),
            },
        );
        account
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }

    fn save_locked(inner: &mut Inner, account: &Account) -> Result<(), StoreError> {
        let stored = inner
            .accounts
            .get_mut(&account.id().into_inner())
            .ok_or(StoreError::NotFound)?;
        if stored.account.version() != account.version() - 1 {
            return Err(StoreError::VersionConflict);
        }
        stored.account = account.clone();
        Ok(())
    }

    fn insert_locked(
        inner: &mut Inner,
        record: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError> {
        if inner
            .records
            .iter()
            .any(|r| r.idempotency_key() == record.idempotency_key())
        {
            return Err(StoreError::DuplicateKey);
        }
        inner.records.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        let inner = self.lock();
        inner
            .accounts
            .get(&id.into_inner())
            .map(|stored| stored.account.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::save_locked(&mut inner, account)
    }

    async fn password_hash(&self, id: AccountId) -> Result<String, StoreError> {
        let inner = self.lock();
        inner
            .accounts
            .get(&id.into_inner())
            .map(|stored| stored.password_hash.clone())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TransactionLogStore for MemoryStore {
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .records
            .iter()
            .find(|r| r.idempotency_key() == key)
            .cloned())
    }

    async fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord, StoreError> {
        let mut inner = self.lock();
        Self::insert_locked(&mut inner, record)
    }

    async fn find_by_account(&self, id: AccountId) -> Result<Vec<TransactionRecord>, StoreError> {
        let inner = self.lock();
        let mut records: Vec<TransactionRecord> = inner
            .records
            .iter()
            .filter(|r| r.source_id() == id || r.destination_id() == id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }
}

#[async_trait]
impl TransferStore for MemoryStore {
    async fn commit_transfer(
        &self,
        source: &Account,
        destination: &Account,
        record: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError> {
        let mut inner = self.lock();

        // Validate both version checks before mutating anything, so a
        // conflict on the second account cannot leave the first updated.
        for account in [source, destination] {
            let stored = inner
                .accounts
                .get(&account.id().into_inner())
                .ok_or(StoreError::NotFound)?;
            if stored.account.version() != account.version() - 1 {
                return Err(StoreError::VersionConflict);
            }
        }
        if inner
            .records
            .iter()
            .any(|r| r.idempotency_key() == record.idempotency_key())
        {
            return Err(StoreError::DuplicateKey);
        }

        Self::save_locked(&mut inner, source)?;
        Self::save_locked(&mut inner, destination)?;
        Self::insert_locked(&mut inner, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: rust_decimal::Decimal) -> Money {
        Money::new(value)
    }

    #[tokio::test]
    async fn test_get_returns_created_account() {
        let store = MemoryStore::new();
        let created =
            store.create_account("Pranav", money(dec!(1000.00)), AccountStatus::Active, "h");

        let loaded = store.get(created.id()).await.unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.version(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_account() {
        let store = MemoryStore::new();
        let err = store.get(AccountId::new(42)).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn test_save_rejects_stale_version() {
        let store = MemoryStore::new();
        let account =
            store.create_account("Pranesh", money(dec!(500.00)), AccountStatus::Active, "h");

        let mut first = store.get(account.id()).await.unwrap();
        let mut second = first.clone();

        first.credit(money(dec!(10.00))).unwrap();
        store.save(&first).await.unwrap();

        second.credit(money(dec!(20.00))).unwrap();
        let err = store.save(&second).await.unwrap_err();
        assert_eq!(err, StoreError::VersionConflict);

        let stored = store.get(account.id()).await.unwrap();
        assert_eq!(stored.balance(), money(dec!(510.00)));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_key() {
        let store = MemoryStore::new();
        let record = TransactionRecord::success(
            AccountId::new(1),
            AccountId::new(2),
            money(dec!(5.00)),
            "k1".to_string(),
        );
        store.insert(record.clone()).await.unwrap();

        let dup = TransactionRecord::success(
            AccountId::new(1),
            AccountId::new(2),
            money(dec!(5.00)),
            "k1".to_string(),
        );
        let err = store.insert(dup).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateKey);

        let found = store.find_by_idempotency_key("k1").await.unwrap().unwrap();
        assert_eq!(found.id(), record.id());
    }

    #[tokio::test]
    async fn test_find_by_account_newest_first() {
        let store = MemoryStore::new();
        let a = store.create_account("A", money(dec!(100.00)), AccountStatus::Active, "h");
        let b = store.create_account("B", money(dec!(100.00)), AccountStatus::Active, "h");

        for key in ["k1", "k2", "k3"] {
            let record =
                TransactionRecord::success(a.id(), b.id(), money(dec!(1.00)), key.to_string());
            store.insert(record).await.unwrap();
        }

        let history = store.find_by_account(a.id()).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].created_at() >= w[1].created_at()));
    }

    #[tokio::test]
    async fn test_commit_transfer_is_all_or_nothing() {
        let store = MemoryStore::new();
        let source = store.create_account("A", money(dec!(100.00)), AccountStatus::Active, "h");
        let destination =
            store.create_account("B", money(dec!(50.00)), AccountStatus::Active, "h");

        let mut src = store.get(source.id()).await.unwrap();
        let mut dst = store.get(destination.id()).await.unwrap();
        src.debit(money(dec!(30.00))).unwrap();
        dst.credit(money(dec!(30.00))).unwrap();

        // Sneak in a concurrent update on the destination.
        let mut racer = store.get(destination.id()).await.unwrap();
        racer.credit(money(dec!(1.00))).unwrap();
        store.save(&racer).await.unwrap();

        let record = TransactionRecord::success(
            source.id(),
            destination.id(),
            money(dec!(30.00)),
            "k1".to_string(),
        );
        let err = store.commit_transfer(&src, &dst, record).await.unwrap_err();
        assert_eq!(err, StoreError::VersionConflict);

        // Source untouched, no record written.
        let stored = store.get(source.id()).await.unwrap();
        assert_eq!(stored.balance(), money(dec!(100.00)));
        assert!(store.find_by_idempotency_key("k1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_transfer_success() {
        let store = MemoryStore::new();
        let source = store.create_account("A", money(dec!(100.00)), AccountStatus::Active, "h");
        let destination =
            store.create_account("B", money(dec!(50.00)), AccountStatus::Active, "h");

        let mut src = store.get(source.id()).await.unwrap();
        let mut dst = store.get(destination.id()).await.unwrap();
        src.debit(money(dec!(30.00))).unwrap();
        dst.credit(money(dec!(30.00))).unwrap();

        let record = TransactionRecord::success(
            source.id(),
            destination.id(),
            money(dec!(30.00)),
            "k1".to_string(),
        );
        let committed = store.commit_transfer(&src, &dst, record).await.unwrap();

        assert_eq!(
            store.get(source.id()).await.unwrap().balance(),
            money(dec!(70.00))
        );
        assert_eq!(
            store.get(destination.id()).await.unwrap().balance(),
            money(dec!(80.00))
        );
        let found = store.find_by_idempotency_key("k1").await.unwrap().unwrap();
        assert_eq!(found.id(), committed.id());
    }
}
