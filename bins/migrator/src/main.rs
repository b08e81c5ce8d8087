//! Database migration runner.
//!
//! Usage:
//!   cargo run -p remit-migrator            # apply pending migrations
//!   cargo run -p remit-migrator -- down    # revert the last migration
//!   cargo run -p remit-migrator -- status  # show migration status
//!   cargo run -p remit-migrator -- fresh   # drop everything and reapply
//!
//! Reads the connection string from `DATABASE_URL`.

use remit_db::migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
