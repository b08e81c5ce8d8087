//! The transfer engine: validation, idempotent settlement, bounded retry.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use remit_shared::AccountId;

use crate::account::{Account, AccountError};
use crate::store::{StoreError, TransferStore};

use super::error::TransferError;
use super::record::TransactionRecord;
use super::request::{TransferReceipt, TransferRequest};

/// How many execution attempts a single request gets before giving up
/// with a transient failure.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Settles transfer requests exactly once per idempotency key.
///
/// A request passes four gates in order: an ownership check against the
/// authenticated principal, static validation of both accounts, an
/// idempotency lookup that replays any previously settled outcome, and
/// finally execution, where both balance mutations and the outcome record
/// commit atomically. Optimistic version conflicts during execution are
/// retried with freshly loaded state up to a fixed budget.
pub struct TransferEngine {
    store: Arc<dyn TransferStore>,
    max_attempts: u32,
}

impl TransferEngine {
    /// Creates an engine with the default retry budget.
    #[must_use]
    pub fn new(store: Arc<dyn TransferStore>) -> Self {
        Self {
            store,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Creates an engine with an explicit retry budget (at least 1).
    #[must_use]
    pub fn with_max_attempts(store: Arc<dyn TransferStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Executes a transfer on behalf of `principal`.
    ///
    /// Returns a receipt for every *settled* outcome, SUCCESS or FAILED;
    /// business-rule failures discovered during execution are recorded and
    /// reported as FAILED receipts, not errors. A retry of an already
    /// settled idempotency key returns the recorded outcome with
    /// `replayed` set.
    ///
    /// # Errors
    ///
    /// All error returns are unrecorded: the ownership gate (`Forbidden`),
    /// static validation (`AccountNotFound`, `AccountNotActive`),
    /// retry-budget exhaustion (`TransientFailure`), and store
    /// infrastructure failures. The same key may be retried after any of
    /// them.
    #[instrument(skip(self, request), fields(
        source = %request.source_id,
        destination = %request.destination_id,
        amount = %request.amount,
    ))]
    pub async fn transfer(
        &self,
        principal: AccountId,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        if principal != request.source_id {
            warn!(%principal, "transfer rejected: principal does not own source account");
            return Err(TransferError::Forbidden);
        }

        self.validate(request).await?;

        if let Some(record) = self
            .store
            .find_by_idempotency_key(&request.idempotency_key)
            .await?
        {
            info!(transaction_id = %record.id(), "replaying settled outcome");
            return Ok(TransferReceipt::from_record(&record, true));
        }

        self.execute(request).await
    }

    /// Static validation against current state. Rejections here are
    /// unrecorded; nothing has been attempted yet. Balance coverage is
    /// deliberately not checked here: insufficiency is a business outcome
    /// discovered by `debit` during execution and settled as FAILED.
    async fn validate(&self, request: &TransferRequest) -> Result<(), TransferError> {
        let source = self.load(request.source_id).await?;
        let destination = self.load(request.destination_id).await?;

        if !source.is_active() {
            return Err(TransferError::AccountNotActive(source.id()));
        }
        if !destination.is_active() {
            return Err(TransferError::AccountNotActive(destination.id()));
        }
        Ok(())
    }

    async fn load(&self, id: AccountId) -> Result<Account, TransferError> {
        match self.store.get(id).await {
            Ok(account) => Ok(account),
            Err(StoreError::NotFound) => Err(TransferError::AccountNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Execution loop: reload fresh state, mutate, commit atomically.
    /// A version conflict means another writer won; reload and try again
    /// within the budget.
    async fn execute(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        for attempt in 1..=self.max_attempts {
            let mut source = self.load(request.source_id).await?;
            let mut destination = self.load(request.destination_id).await?;

            if let Err(reason) = Self::apply(&mut source, &mut destination, request) {
                return self.settle_failure(request, &reason).await;
            }

            let record = TransactionRecord::success(
                request.source_id,
                request.destination_id,
                request.amount,
                request.idempotency_key.clone(),
            );
            match self
                .store
                .commit_transfer(&source, &destination, record)
                .await
            {
                Ok(committed) => {
                    info!(transaction_id = %committed.id(), "transfer committed");
                    return Ok(TransferReceipt::from_record(&committed, false));
                }
                Err(StoreError::VersionConflict) => {
                    warn!(attempt, "version conflict, retrying with fresh state");
                }
                Err(StoreError::DuplicateKey) => return self.replay(request).await,
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            max_attempts = self.max_attempts,
            "retry budget exhausted without settling"
        );
        Err(TransferError::TransientFailure)
    }

    /// Applies both mutations in memory. Debit first so an inert source
    /// is caught before the destination is touched.
    fn apply(
        source: &mut Account,
        destination: &mut Account,
        request: &TransferRequest,
    ) -> Result<(), AccountError> {
        source.debit(request.amount)?;
        destination.credit(request.amount)?;
        Ok(())
    }

    /// Records a business-rule failure so replays of this key report the
    /// same outcome. Account balances are untouched.
    async fn settle_failure(
        &self,
        request: &TransferRequest,
        reason: &AccountError,
    ) -> Result<TransferReceipt, TransferError> {
        let record = TransactionRecord::failed(
            request.source_id,
            request.destination_id,
            request.amount,
            request.idempotency_key.clone(),
            reason.to_string(),
        );
        match self.store.insert(record).await {
            Ok(inserted) => {
                info!(transaction_id = %inserted.id(), %reason, "transfer settled as FAILED");
                Ok(TransferReceipt::from_record(&inserted, false))
            }
            // A concurrent request with the same key settled first; its
            // outcome wins.
            Err(StoreError::DuplicateKey) => self.replay(request).await,
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the settled outcome for a key that lost an insert race.
    async fn replay(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        let record = self
            .store
            .find_by_idempotency_key(&request.idempotency_key)
            .await?
            .ok_or(TransferError::TransientFailure)?;
        info!(transaction_id = %record.id(), "replaying outcome settled by concurrent request");
        Ok(TransferReceipt::from_record(&record, true))
    }
}
