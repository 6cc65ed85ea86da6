use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*};
use diesel_async::RunQueryDsl;
use tokio::sync::broadcast;

use super::PostService;
use crate::{
    models::{NewPost, Post, User},
    schema::posts,
    subject::Snapshot,
    Database,
};

#[async_trait]
impl PostService for Database {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<Post>> {
        self.posts.subscribe()
    }

    async fn emit_posts(&self) {
        match self.load_posts().await {
            Ok(posts) => {
                self.posts.next(&posts);
            }
            Err(err) => log::error!("Error loading posts, {:#?}", err),
        }
    }

    async fn create_post(&self, post: NewPost) -> anyhow::Result<Post> {
        if post.title.trim().is_empty() {
            return Err(anyhow!("post title is empty"));
        }

        let mut conn = self.connection().await;
        if User::by_id(post.author, &mut conn).await?.is_none() {
            return Err(anyhow!("author {} not found", post.author));
        }

        Ok(insert_into(posts::table)
            .values((
                posts::author.eq(post.author),
                posts::title.eq(post.title),
                posts::content.eq(post.content),
                posts::published.eq(Utc::now()),
            ))
            .returning(Post::as_returning())
            .get_result(&mut *conn)
            .await?)
    }
}
