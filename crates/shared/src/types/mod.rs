//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::{AccountId, TransactionId};
pub use money::Money;
