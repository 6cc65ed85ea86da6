use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{schema::likes, types::DbId};

#[derive(
    Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = likes)]
pub struct Like {
    pub author: DbId,
    pub post: DbId,
    pub published: DateTime<Utc>,
}

impl Like {
    pub fn new(author: DbId, post: DbId) -> Self {
        Like {
            author,
            post,
            published: Utc::now(),
        }
    }

    /// Two likes are the same record when they share author and post.
    pub fn same_as(&self, other: &Like) -> bool {
        self.author == other.author && self.post == other.post
    }
}
