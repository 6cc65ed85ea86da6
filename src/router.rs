use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use web::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    api::routers::app(state).layer(TraceLayer::new_for_http())
}
