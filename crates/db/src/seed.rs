use std::path::Path;

use anyhow::Context;
use diesel::{dsl::count_star, insert_into, prelude::*};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};

use crate::{
    models::{Like, Message, Post, User},
    schema::{likes, messages, posts, users},
    Database,
};

/// Rows loaded into an empty database at startup.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub likes: Vec<Like>,
}

impl Seed {
    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("malformed seed {}", path.display()))
    }
}

impl Database {
    /// Inserts every row of `seed` in one transaction.
    pub async fn import(&self, seed: &Seed) -> anyhow::Result<()> {
        let seed = seed.clone();
        let mut conn = self.connection().await;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            async move {
                for user in &seed.users {
                    insert_into(users::table).values(user).execute(conn).await?;
                }
                for post in &seed.posts {
                    insert_into(posts::table).values(post).execute(conn).await?;
                }
                for message in &seed.messages {
                    insert_into(messages::table).values(message).execute(conn).await?;
                }
                for like in &seed.likes {
                    insert_into(likes::table).values(like).execute(conn).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn is_empty(&self) -> anyhow::Result<bool> {
        let mut conn = self.connection().await;
        let users = users::table
            .select(count_star())
            .get_result::<i64>(&mut *conn)
            .await?;
        let posts = posts::table
            .select(count_star())
            .get_result::<i64>(&mut *conn)
            .await?;
        Ok(users == 0 && posts == 0)
    }
}
