//! Remit API server.
//!
//! Serves the transfer and account-query API over HTTP. Connects to
//! Postgres when a `[database]` section is configured; otherwise falls
//! back to an in-memory store seeded with demo accounts, which is only
//! suitable for local development.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use remit_api::{AppState, create_router};
use remit_core::account::AccountStatus;
use remit_core::auth::hash_password;
use remit_core::store::{MemoryStore, TransferStore};
use remit_db::PgStore;
use remit_shared::{AppConfig, JwtConfig, JwtService, Money};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remit=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let store: Arc<dyn TransferStore> = match &config.database {
        Some(database) => {
            let db = remit_db::connect(&database.url, database.max_connections).await?;
            info!("Connected to database");
            Arc::new(PgStore::new(db))
        }
        None => {
            warn!("No database configured, running on an in-memory store");
            Arc::new(seed_memory_store()?)
        }
    };

    #[allow(clippy::cast_possible_wrap)]
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    });

    let state = AppState::new(store, jwt_service);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Demo accounts for running without a database.
const DEMO_ACCOUNTS: [(&str, &str); 4] = [
    ("Pranav", "pranav123"),
    ("Pranesh", "pranesh123"),
    ("Pradeep", "pradeep123"),
    ("Nivedita", "nivedita123"),
];

fn seed_memory_store() -> anyhow::Result<MemoryStore> {
    let store = MemoryStore::new();
    for (holder, password) in DEMO_ACCOUNTS {
        let account = store.create_account(
            holder,
            Money::new(Decimal::new(100_000, 2)),
            AccountStatus::Active,
            hash_password(password)?,
        );
        info!(account = %account.id(), holder, "seeded demo account");
    }
    Ok(store)
}
