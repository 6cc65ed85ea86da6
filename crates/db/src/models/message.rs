use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{schema::messages, types::DbId};

/// A comment attached to a post.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, Serialize, Deserialize, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: DbId,
    pub author: DbId,
    pub msg: String,
    pub post: DbId,
    #[serde(default)]
    #[diesel(column_name = like_count)]
    pub like: i32,
    pub published: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub author: DbId,
    pub msg: String,
    pub post: DbId,
    #[diesel(column_name = like_count)]
    pub like: i32,
    pub published: DateTime<Utc>,
}
