//! The idempotent transfer protocol.
//!
//! A transfer request is settled exactly once per idempotency key: the
//! engine consults the transaction log before executing, commits both
//! account writes and the outcome record as one atomic unit, and replays
//! the recorded outcome verbatim for any retry of a settled key.

mod engine;
mod error;
mod record;
mod request;

pub use engine::TransferEngine;
pub use error::TransferError;
pub use record::{TransactionRecord, TransferOutcome};
pub use request::{TransferReceipt, TransferRequest};
