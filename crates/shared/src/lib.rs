//! Shared types, errors, and configuration for Remit.
//!
//! This crate provides common types used across all other crates:
//! - Money type with exact decimal arithmetic at a fixed 2-digit scale
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - JWT token handling

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{AccountId, Money, TransactionId};
