//! Seeds demo accounts for local development.
//!
//! Reads the connection string from `DATABASE_URL`, applies pending
//! migrations, and provisions four demo accounts with a 1000.00 opening
//! balance each. Seeding is skipped when any account already exists, so
//! the binary is safe to run repeatedly.

use anyhow::Context;
use rust_decimal::Decimal;

use remit_core::account::AccountStatus;
use remit_core::auth::hash_password;
use remit_db::PgStore;
use remit_db::migration::{Migrator, MigratorTrait};
use remit_shared::Money;

const DEMO_ACCOUNTS: [(&str, &str); 4] = [
    ("Pranav", "pranav123"),
    ("Pranesh", "pranesh123"),
    ("Pradeep", "pradeep123"),
    ("Nivedita", "nivedita123"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let db = remit_db::connect(&database_url, 5).await?;

    println!("Applying pending migrations...");
    Migrator::up(&db, None).await?;

    let store = PgStore::new(db);

    if store.count_accounts().await? > 0 {
        println!("Accounts already exist, skipping seeding.");
        return Ok(());
    }

    println!("Seeding demo accounts...");
    for (holder, password) in DEMO_ACCOUNTS {
        let account = store
            .create_account(
                holder,
                Money::new(Decimal::new(100_000, 2)),
                AccountStatus::Active,
                hash_password(password)?,
            )
            .await?;
        println!("  Created account {} for {holder}", account.id());
    }

    println!("Seeding complete!");
    Ok(())
}
