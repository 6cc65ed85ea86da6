pub mod api;
pub mod auth;
pub mod posts;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};
use web::AppState;

use crate::auth_middleware::optional_auth_middleware;

/// Server-rendered pages.
pub fn pages(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(posts::posts())
        .merge(auth::auth())
        .route_layer(from_fn_with_state(
            Arc::clone(state),
            optional_auth_middleware,
        ))
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(pages(&state))
        .merge(api::api(&state))
        .with_state(state)
}
