//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for login, transfers, and account queries
//! - Authentication middleware and the `AuthUser` extractor
//! - The JSON error envelope

pub mod error;
pub mod middleware;
pub mod routes;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use remit_core::auth::Authenticator;
use remit_core::query::AccountQueries;
use remit_core::store::TransferStore;
use remit_core::transfer::TransferEngine;
use remit_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The store backing engine and queries.
    pub store: Arc<dyn TransferStore>,
    /// The transfer engine.
    pub engine: Arc<TransferEngine>,
    /// Read-only account queries.
    pub queries: AccountQueries,
    /// Credential verification.
    pub authenticator: Authenticator,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Wires the full application state over one store.
    #[must_use]
    pub fn new(store: Arc<dyn TransferStore>, jwt_service: JwtService) -> Self {
        Self {
            engine: Arc::new(TransferEngine::new(store.clone())),
            queries: AccountQueries::new(store.clone()),
            authenticator: Authenticator::new(store.clone()),
            jwt_service: Arc::new(jwt_service),
            store,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
