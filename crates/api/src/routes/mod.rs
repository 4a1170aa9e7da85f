//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod balance;
pub mod health;
pub mod profile;
pub mod wagers;

/// Creates the API router with all routes.
///
/// Balance, wager, and profile routes sit behind the auth middleware;
/// health and auth routes are public.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(balance::routes())
        .merge(wagers::routes())
        .merge(profile::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
