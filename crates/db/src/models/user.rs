use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{database::DbConnection, schema::users, types::DbId};

#[derive(
    Queryable, Selectable, Identifiable, Insertable, Serialize, Deserialize, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = users)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_encrypted: Option<String>,
    pub published: DateTime<Utc>,
}

impl User {
    pub async fn by_id(id: DbId, conn: &mut DbConnection) -> anyhow::Result<Option<Self>> {
        Ok(users::table
            .find(id)
            .select(User::as_select())
            .first(conn)
            .await
            .optional()?)
    }

    /// Emails are matched without regard to case or surrounding whitespace.
    pub async fn by_email(email: &str, conn: &mut DbConnection) -> anyhow::Result<Option<Self>> {
        Ok(users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .select(User::as_select())
            .first(conn)
            .await
            .optional()?)
    }
}
