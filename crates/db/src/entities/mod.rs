//! `SeaORM` entity definitions.

pub mod accounts;
pub mod transaction_logs;
