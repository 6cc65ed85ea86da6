use std::sync::Arc;

use db::{
    services::{LikeService, MessageService, PostService, UserService},
    Database,
};

/// The data services a view binds to.
#[derive(Clone)]
pub struct Services {
    pub posts: Arc<dyn PostService>,
    pub users: Arc<dyn UserService>,
    pub messages: Arc<dyn MessageService>,
    pub likes: Arc<dyn LikeService>,
}

impl Services {
    pub fn from_database(db: Arc<Database>) -> Self {
        Services {
            posts: db.clone(),
            users: db.clone(),
            messages: db.clone(),
            likes: db,
        }
    }
}
