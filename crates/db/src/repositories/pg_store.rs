//! The Postgres store.
//!
//! Optimistic locking is done in SQL: account updates carry a
//! `WHERE version = <version read>` filter, and zero affected rows is
//! reported as a version conflict. Idempotency-key uniqueness rides on the
//! unique index, so a lost insert race surfaces as a unique-constraint
//! violation rather than a stale pre-check.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionError, TransactionTrait,
};

use remit_core::account::{Account, AccountStatus};
use remit_core::store::{AccountStore, StoreError, TransactionLogStore, TransferStore};
use remit_core::transfer::{TransactionRecord, TransferOutcome};
use remit_shared::{AccountId, Money, TransactionId};

use crate::entities::{accounts, transaction_logs};

/// Store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    /// Creates a store over an established connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Provisions an account with a database-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the insert fails.
    pub async fn create_account(
        &self,
        holder_name: impl Into<String> + Send,
        balance: Money,
        status: AccountStatus,
        password_hash: impl Into<String> + Send,
    ) -> Result<Account, StoreError> {
        let model = accounts::ActiveModel {
            id: NotSet,
            holder_name: Set(holder_name.into()),
            balance: Set(balance.into_inner()),
            status: Set(status.as_str().to_string()),
            version: Set(0),
            password_hash: Set(password_hash.into()),
            last_updated: Set(chrono::Utc::now().fixed_offset()),
        };
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        account_from_model(inserted)
    }

    /// Number of provisioned accounts. Used by the seeder to keep
    /// seeding idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the query fails.
    pub async fn count_accounts(&self) -> Result<u64, StoreError> {
        accounts::Entity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(StoreError::NotFound)?;
        account_from_model(model)
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        save_account(&self.db, account).await
    }

    async fn password_hash(&self, id: AccountId) -> Result<String, StoreError> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(StoreError::NotFound)?;
        Ok(model.password_hash)
    }
}

#[async_trait]
impl TransactionLogStore for PgStore {
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let model = transaction_logs::Entity::find()
            .filter(transaction_logs::Column::IdempotencyKey.eq(key))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        model.map(record_from_model).transpose()
    }

    async fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord, StoreError> {
        insert_record(&self.db, &record).await?;
        Ok(record)
    }

    async fn find_by_account(&self, id: AccountId) -> Result<Vec<TransactionRecord>, StoreError> {
        let models = transaction_logs::Entity::find()
            .filter(
                Condition::any()
                    .add(transaction_logs::Column::SourceAccountId.eq(id.into_inner()))
                    .add(transaction_logs::Column::DestinationAccountId.eq(id.into_inner())),
            )
            .order_by_desc(transaction_logs::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        models.into_iter().map(record_from_model).collect()
    }
}

#[async_trait]
impl TransferStore for PgStore {
    async fn commit_transfer(
        &self,
        source: &Account,
        destination: &Account,
        record: TransactionRecord,
    ) -> Result<TransactionRecord, StoreError> {
        let source = source.clone();
        let destination = destination.clone();

        self.db
            .transaction::<_, TransactionRecord, StoreError>(move |txn| {
                Box::pin(async move {
                    save_account(txn, &source).await?;
                    save_account(txn, &destination).await?;
                    insert_record(txn, &record).await?;
                    Ok(record)
                })
            })
            .await
            .map_err(|err| match err {
                TransactionError::Connection(db) => map_db_err(db),
                TransactionError::Transaction(store) => store,
            })
    }
}

/// Version-checked account update usable on a pool or inside a transaction.
async fn save_account<C: ConnectionTrait>(conn: &C, account: &Account) -> Result<(), StoreError> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            Expr::value(account.balance().into_inner()),
        )
        .col_expr(
            accounts::Column::Status,
            Expr::value(account.status().as_str()),
        )
        .col_expr(accounts::Column::Version, Expr::value(account.version()))
        .col_expr(
            accounts::Column::LastUpdated,
            Expr::value(account.last_updated().fixed_offset()),
        )
        .filter(accounts::Column::Id.eq(account.id().into_inner()))
        .filter(accounts::Column::Version.eq(account.version() - 1))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected == 0 {
        let exists = accounts::Entity::find_by_id(account.id().into_inner())
            .one(conn)
            .await
            .map_err(map_db_err)?
            .is_some();
        return Err(if exists {
            StoreError::VersionConflict
        } else {
            StoreError::NotFound
        });
    }
    Ok(())
}

async fn insert_record<C: ConnectionTrait>(
    conn: &C,
    record: &TransactionRecord,
) -> Result<(), StoreError> {
    let model = transaction_logs::ActiveModel {
        id: Set(record.id().into_inner()),
        source_account_id: Set(record.source_id().into_inner()),
        destination_account_id: Set(record.destination_id().into_inner()),
        amount: Set(record.amount().into_inner()),
        outcome: Set(record.outcome().as_str().to_string()),
        failure_reason: Set(record.failure_reason().map(ToString::to_string)),
        idempotency_key: Set(record.idempotency_key().to_string()),
        created_at: Set(record.created_at().fixed_offset()),
    };
    model.insert(conn).await.map_err(map_db_err)?;
    Ok(())
}

fn map_db_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateKey,
        _ => StoreError::Unavailable(err.to_string()),
    }
}

fn account_from_model(model: accounts::Model) -> Result<Account, StoreError> {
    let status = model
        .status
        .parse::<AccountStatus>()
        .map_err(StoreError::Unavailable)?;
    Ok(Account::from_parts(
        AccountId::new(model.id),
        model.holder_name,
        Money::new(model.balance),
        status,
        model.version,
        model.last_updated.with_timezone(&chrono::Utc),
    ))
}

fn record_from_model(model: transaction_logs::Model) -> Result<TransactionRecord, StoreError> {
    let outcome = model
        .outcome
        .parse::<TransferOutcome>()
        .map_err(StoreError::Unavailable)?;
    Ok(TransactionRecord::from_parts(
        TransactionId::from_uuid(model.id),
        AccountId::new(model.source_account_id),
        AccountId::new(model.destination_account_id),
        Money::new(model.amount),
        outcome,
        model.failure_reason,
        model.idempotency_key,
        model.created_at.with_timezone(&chrono::Utc),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_model_conversion() {
        let model = accounts::Model {
            id: 7,
            holder_name: "Pranav".to_string(),
            balance: dec!(1000.00),
            status: "ACTIVE".to_string(),
            version: 3,
            password_hash: "$argon2id$x".to_string(),
            last_updated: chrono::Utc::now().fixed_offset(),
        };

        let account = account_from_model(model).unwrap();
        assert_eq!(account.id(), AccountId::new(7));
        assert_eq!(account.balance(), Money::new(dec!(1000.00)));
        assert_eq!(account.status(), AccountStatus::Active);
        assert_eq!(account.version(), 3);
    }

    #[test]
    fn test_corrupt_status_is_unavailable() {
        let model = accounts::Model {
            id: 7,
            holder_name: "Pranav".to_string(),
            balance: dec!(0.00),
            status: "FROZEN".to_string(),
            version: 0,
            password_hash: String::new(),
            last_updated: chrono::Utc::now().fixed_offset(),
        };

        let err = account_from_model(model).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_record_model_conversion() {
        let id = uuid::Uuid::now_v7();
        let model = transaction_logs::Model {
            id,
            source_account_id: 1,
            destination_account_id: 2,
            amount: dec!(300.00),
            outcome: "FAILED".to_string(),
            failure_reason: Some("insufficient balance".to_string()),
            idempotency_key: "k1".to_string(),
            created_at: chrono::Utc::now().fixed_offset(),
        };

        let record = record_from_model(model).unwrap();
        assert_eq!(record.id(), TransactionId::from_uuid(id));
        assert_eq!(record.outcome(), TransferOutcome::Failed);
        assert_eq!(record.failure_reason(), Some("insufficient balance"));
        assert_eq!(record.amount(), Money::new(dec!(300.00)));
    }
}
