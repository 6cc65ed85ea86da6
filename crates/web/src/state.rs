use std::sync::Arc;

use db::Database;
use view::Services;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub services: Services,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: Config) -> Self {
        AppState {
            services: Services::from_database(Arc::clone(&db)),
            db,
            config,
        }
    }
}
