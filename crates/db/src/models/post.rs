use anyhow::anyhow;
use chrono::{DateTime, Utc};
use diesel::{prelude::*, update};
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    database::DbConnection,
    schema::posts,
    types::{Counter, DbId},
};

#[derive(
    Queryable, Selectable, Identifiable, Insertable, Serialize, Deserialize, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: DbId,
    pub author: DbId,
    pub title: String,
    pub content: String,
    /// Number of likes on the post.
    #[diesel(column_name = like_count)]
    pub like: i32,
    /// Number of messages on the post.
    #[diesel(column_name = msg_count)]
    pub msg: i32,
    pub published: DateTime<Utc>,
}

impl Post {
    pub fn counter(&self, counter: Counter) -> i32 {
        match counter {
            Counter::Likes => self.like,
            Counter::Messages => self.msg,
        }
    }

    /// Applies `delta` to a counter. Counters never drop below zero.
    pub fn adjust(&mut self, counter: Counter, delta: i32) {
        let value = match counter {
            Counter::Likes => &mut self.like,
            Counter::Messages => &mut self.msg,
        };
        *value = value.saturating_add(delta).max(0);
    }

    pub async fn by_id(id: DbId, conn: &mut DbConnection) -> anyhow::Result<Option<Self>> {
        Ok(posts::table
            .find(id)
            .select(Post::as_select())
            .first(conn)
            .await
            .optional()?)
    }

    /// Adjusts a counter of the stored post. Callers run this inside the
    /// transaction that creates or deletes the counted row.
    pub(crate) async fn adjust_counter(
        id: DbId,
        counter: Counter,
        delta: i32,
        conn: &mut DbConnection,
    ) -> anyhow::Result<Post> {
        let mut post = Post::by_id(id, conn)
            .await?
            .ok_or(anyhow!("post {} not found", id))?;
        post.adjust(counter, delta);

        update(posts::table.find(id))
            .set((
                posts::like_count.eq(post.like),
                posts::msg_count.eq(post.msg),
            ))
            .execute(conn)
            .await?;

        Ok(post)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewPost {
    pub author: DbId,
    pub title: String,
    #[serde(default)]
    pub content: String,
}
