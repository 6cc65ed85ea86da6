pub mod auth;
pub mod posts;

use std::sync::Arc;

use axum::Router;
use web::AppState;

/// JSON API under `/api/v1`.
pub fn api(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(posts::posts(state))
        .merge(auth::auth(state))
}
