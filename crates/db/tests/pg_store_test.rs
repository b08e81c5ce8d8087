//! Integration tests against a live Postgres instance.
//!
//! These run only when `DATABASE_URL` is set; without it every test
//! returns early. Migrations are applied on first connect, and each test
//! provisions its own accounts and idempotency keys so the suite can run
//! repeatedly against the same database.

use std::sync::Arc;

use rust_decimal_macros::dec;

use remit_core::account::AccountStatus;
use remit_core::store::{AccountStore, StoreError, TransactionLogStore, TransferStore};
use remit_core::transfer::{TransactionRecord, TransferEngine, TransferRequest};
use remit_db::migration::{Migrator, MigratorTrait};
use remit_db::PgStore;
use remit_shared::Money;

async fn store() -> Option<PgStore> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = remit_db::connect(&url, 5).await.expect("database connection");
    Migrator::up(&db, None).await.expect("migrations");
    Some(PgStore::new(db))
}

fn unique_key() -> String {
    uuid::Uuid::now_v7().to_string()
}

#[tokio::test]
async fn test_save_rejects_stale_version() {
    let Some(store) = store().await else { return };

    let account = store
        .create_account("Pranav", Money::new(dec!(500.00)), AccountStatus::Active, "h")
        .await
        .unwrap();

    let mut first = store.get(account.id()).await.unwrap();
    let mut second = first.clone();

    first.credit(Money::new(dec!(10.00))).unwrap();
    store.save(&first).await.unwrap();

    second.credit(Money::new(dec!(20.00))).unwrap();
    let err = store.save(&second).await.unwrap_err();
    assert_eq!(err, StoreError::VersionConflict);

    let stored = store.get(account.id()).await.unwrap();
    assert_eq!(stored.balance(), Money::new(dec!(510.00)));
    assert_eq!(stored.version(), 1);
}

#[tokio::test]
async fn test_duplicate_idempotency_key_is_rejected() {
    let Some(store) = store().await else { return };

    let a = store
        .create_account("A", Money::new(dec!(100.00)), AccountStatus::Active, "h")
        .await
        .unwrap();
    let b = store
        .create_account("B", Money::new(dec!(100.00)), AccountStatus::Active, "h")
        .await
        .unwrap();

    let key = unique_key();
    let record =
        TransactionRecord::success(a.id(), b.id(), Money::new(dec!(5.00)), key.clone());
    store.insert(record.clone()).await.unwrap();

    let dup = TransactionRecord::success(a.id(), b.id(), Money::new(dec!(5.00)), key.clone());
    let err = store.insert(dup).await.unwrap_err();
    assert_eq!(err, StoreError::DuplicateKey);

    let found = store.find_by_idempotency_key(&key).await.unwrap().unwrap();
    assert_eq!(found.id(), record.id());
}

#[tokio::test]
async fn test_commit_transfer_rolls_back_on_conflict() {
    let Some(store) = store().await else { return };

    let source = store
        .create_account("A", Money::new(dec!(100.00)), AccountStatus::Active, "h")
        .await
        .unwrap();
    let destination = store
        .create_account("B", Money::new(dec!(50.00)), AccountStatus::Active, "h")
        .await
        .unwrap();

    let mut src = store.get(source.id()).await.unwrap();
    let mut dst = store.get(destination.id()).await.unwrap();
    src.debit(Money::new(dec!(30.00))).unwrap();
    dst.credit(Money::new(dec!(30.00))).unwrap();

    // Concurrent update on the destination invalidates its version.
    let mut racer = store.get(destination.id()).await.unwrap();
    racer.credit(Money::new(dec!(1.00))).unwrap();
    store.save(&racer).await.unwrap();

    let key = unique_key();
    let record =
        TransactionRecord::success(source.id(), destination.id(), Money::new(dec!(30.00)), key.clone());
    let err = store.commit_transfer(&src, &dst, record).await.unwrap_err();
    assert_eq!(err, StoreError::VersionConflict);

    // The source debit rolled back with the rest of the transaction.
    assert_eq!(
        store.get(source.id()).await.unwrap().balance(),
        Money::new(dec!(100.00))
    );
    assert!(store.find_by_idempotency_key(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_engine_settles_and_replays_through_postgres() {
    let Some(store) = store().await else { return };

    let source = store
        .create_account("Pranav", Money::new(dec!(1000.00)), AccountStatus::Active, "h")
        .await
        .unwrap();
    let destination = store
        .create_account("Pranesh", Money::new(dec!(500.00)), AccountStatus::Active, "h")
        .await
        .unwrap();

    let store: Arc<dyn TransferStore> = Arc::new(store);
    let engine = TransferEngine::new(store.clone());

    let key = unique_key();
    let req =
        TransferRequest::new(source.id(), destination.id(), Money::new(dec!(300.00)), key).unwrap();

    let first = engine.transfer(source.id(), &req).await.unwrap();
    assert!(first.is_success());
    assert!(!first.replayed);

    let second = engine.transfer(source.id(), &req).await.unwrap();
    assert!(second.replayed);
    assert_eq!(second.transaction_id, first.transaction_id);

    assert_eq!(
        store.get(source.id()).await.unwrap().balance(),
        Money::new(dec!(700.00))
    );
    assert_eq!(
        store.get(destination.id()).await.unwrap().balance(),
        Money::new(dec!(800.00))
    );
}
