//! Data services the views bind to.
//!
//! Each service publishes full snapshots of its collection on a
//! [`Subject`](crate::subject::Subject). Mutations persist before they
//! return but never emit on their own; callers ask for a fresh emission
//! once they are done. Creating or deleting a like or a message updates the
//! post's counter in the same transaction.

mod likes;
mod messages;
mod posts;
mod users;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::{
    models::{Like, Message, NewMessage, NewPost, Post, User},
    subject::Snapshot,
    types::DbId,
};

#[async_trait]
pub trait PostService: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<Post>>;

    async fn emit_posts(&self);

    async fn create_post(&self, post: NewPost) -> anyhow::Result<Post>;
}

#[async_trait]
pub trait UserService: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<User>>;

    async fn emit_users(&self);

    async fn user_id(&self, email: &str) -> anyhow::Result<Option<DbId>>;

    async fn by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn register(&self, name: String, email: String, password: String)
        -> anyhow::Result<User>;
}

#[async_trait]
pub trait MessageService: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<Message>>;

    async fn emit_messages(&self);

    /// Stores the message and counts it on its post.
    async fn create_message(&self, message: NewMessage) -> anyhow::Result<Message>;
}

#[async_trait]
pub trait LikeService: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<Like>>;

    async fn emit_likes(&self);

    /// Stores the like and counts it on its post. Returns `false` when the
    /// author already likes the post.
    async fn add_like(&self, like: Like) -> anyhow::Result<bool>;

    /// Deletes the like and uncounts it. Returns `false` when there was
    /// nothing to remove.
    async fn remove_like(&self, like: &Like) -> anyhow::Result<bool>;
}
