//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod documents;
pub mod folders;
pub mod health;
pub mod share;
pub mod templates;

/// Creates the API router with all routes.
///
/// Share resolution stays outside the auth layer: the capability token in
/// the query string is the only credential it needs.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(documents::routes())
        .merge(folders::routes())
        .merge(templates::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(share::routes())
        .merge(protected_routes)
}
