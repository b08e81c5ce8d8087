//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod auth;
pub mod health;
pub mod transfers;

/// Creates the `/api` router: public auth routes plus the protected
/// `/v1` surface behind the JWT middleware.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(accounts::routes())
        .merge(transfers::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(auth::routes())
        .nest("/v1", protected)
}
