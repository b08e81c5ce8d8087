//! Core business logic for Remit.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, mutation rules, and the transfer
//! protocol live here; durable state is reached only through the store
//! contracts in [`store`].
//!
//! # Modules
//!
//! - `account` - ledger account entity and debit/credit rules
//! - `transfer` - idempotent transfer engine and transaction records
//! - `store` - store contracts and the in-memory implementation
//! - `query` - read-only balance/history lookups
//! - `auth` - password hashing for the authentication collaborator

pub mod account;
pub mod auth;
pub mod query;
pub mod store;
pub mod transfer;
