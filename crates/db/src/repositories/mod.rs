//! Postgres implementation of the core store contracts.

mod pg_store;

pub use pg_store::PgStore;
