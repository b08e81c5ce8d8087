//! Store contracts for durable account and transaction-log state.
//!
//! The contract is deliberately narrow: a durable, transactional record
//! store with row-level optimistic versioning on accounts and a uniqueness
//! constraint on the transaction log's idempotency key. Everything else
//! about persistence (engine, schema, pooling) lives behind these traits.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use remit_shared::AccountId;

use crate::account::Account;
use crate::transfer::TransactionRecord;

/// Errors surfaced by the store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No row with the requested id.
    #[error("record not found")]
    NotFound,

    /// The stored version no longer matches the version the caller read.
    /// Reload and retry; this is how lost updates are prevented.
    #[error("version conflict: row was modified concurrently")]
    VersionConflict,

    /// A concurrent insert with the same idempotency key won the race.
    #[error("duplicate idempotency key")]
    DuplicateKey,

    /// Infrastructure failure (connection lost, pool exhausted, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for remit_shared::AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("account not found".to_string()),
            StoreError::Unavailable(_) => Self::Unavailable(err.to_string()),
            StoreError::VersionConflict | StoreError::DuplicateKey => {
                Self::Database(err.to_string())
            }
        }
    }
}

/// Durable account state with optimistic-version-checked writes.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Loads an account by id.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the account does not exist.
    async fn get(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Persists a mutated account.
    ///
    /// Succeeds only if the stored version equals the version the caller
    /// last read (`account.version() - 1`, since every mutation advances
    /// the in-memory version by one).
    ///
    /// # Errors
    ///
    /// `StoreError::VersionConflict` if another writer got there first;
    /// the caller must reload fresh state and retry.
    async fn save(&self, account: &Account) -> Result<(), StoreError>;

    /// Returns the stored password hash for an account.
    ///
    /// Credential storage is kept out of the domain entity; only the
    /// authentication collaborator consumes this.
    async fn password_hash(&self, id: AccountId) -> Result<String, StoreError>;
}

/// Durable, append-only transaction log keyed for idempotent lookup.
#[async_trait]
pub trait TransactionLogStore: Send + Sync {
    /// Looks up a settled record by idempotency key.
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionRecord>, StoreError>;

    /// Inserts a record, enforcing idempotency-key uniqueness.
    ///
    /// Uniqueness is enforced here, not by a prior lookup, which closes
    /// the check-then-act race between concurrent requests bearing the
    /// same key.
    ///
    /// # Errors
    ///
    /// `StoreError::DuplicateKey` if a record with the key already exists.
    async fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord, StoreError>;

    /// Returns all records where the account is source or destination,
    /// newest first.
    async fn find_by_account(&self, id: AccountId) -> Result<Vec<TransactionRecord>, StoreError>;
}

/// Combined store able to commit a transfer as one atomic unit.
#[async_trait]
pub trait TransferStore: AccountStore + TransactionLogStore {
    /// Atomically persists both version-checked account writes and the one
    /// outcome record. Either everything commits or nothing does.
    ///
    /// # Errors
    ///
    /// `StoreError::VersionConflict` if either account was modified
    /// concurrently; `StoreError::DuplicateKey` if a record with the same
    /// idempotency key was inserted concurrently.
    async fn commit_transfer(
        &self,
        source: &Account,
        destination: &Account,
        record: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError>;
}
