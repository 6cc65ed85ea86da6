use async_trait::async_trait;
use diesel::{delete, insert_into, prelude::*};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};
use tokio::sync::broadcast;

use super::LikeService;
use crate::{
    models::{Like, Post},
    schema::likes,
    subject::Snapshot,
    types::Counter,
    Database,
};

#[async_trait]
impl LikeService for Database {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<Like>> {
        self.likes.subscribe()
    }

    async fn emit_likes(&self) {
        match self.load_likes().await {
            Ok(likes) => {
                self.likes.next(&likes);
            }
            Err(err) => log::error!("Error loading likes, {:#?}", err),
        }
    }

    async fn add_like(&self, like: Like) -> anyhow::Result<bool> {
        let mut conn = self.connection().await;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            async move {
                let inserted = insert_into(likes::table)
                    .values(&like)
                    .on_conflict((likes::author, likes::post))
                    .do_nothing()
                    .execute(conn)
                    .await?;
                if inserted == 0 {
                    return Ok(false);
                }

                Post::adjust_counter(like.post, Counter::Likes, 1, conn).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
    }

    async fn remove_like(&self, like: &Like) -> anyhow::Result<bool> {
        let (author, post) = (like.author, like.post);
        let mut conn = self.connection().await;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            async move {
                let deleted = delete(
                    likes::table
                        .filter(likes::author.eq(author))
                        .filter(likes::post.eq(post)),
                )
                .execute(conn)
                .await?;
                if deleted == 0 {
                    return Ok(false);
                }

                Post::adjust_counter(post, Counter::Likes, -1, conn).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
    }
}
