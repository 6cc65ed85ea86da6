use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use diesel::{delete, insert_into, prelude::*};
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{models::User, schema::sessions, types::DbId, utils::random_string, Database};

/// Sessions older than this are expired and pruned on the next lookup.
pub const SESSION_LIFETIME_DAYS: i64 = 30;

#[derive(
    Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub token: String,
    pub user_id: DbId,
    pub published: DateTime<Utc>,
}

impl Session {
    pub async fn create(user_id: DbId, db: &Database) -> anyhow::Result<Self> {
        let session = Session {
            token: random_string(60),
            user_id,
            published: Utc::now(),
        };

        insert_into(sessions::table)
            .values(&session)
            .execute(&mut *db.connection().await)
            .await?;

        Ok(session)
    }

    pub async fn by_token(token: &str, db: &Database) -> anyhow::Result<Option<Self>> {
        let mut conn = db.connection().await;

        let pruned = delete(sessions::table.filter(sessions::published.lt(Self::expiry_cutoff())))
            .execute(&mut *conn)
            .await?;
        if pruned > 0 {
            log::debug!("pruned {} expired sessions", pruned);
        }

        Ok(sessions::table
            .find(token)
            .select(Session::as_select())
            .first(&mut *conn)
            .await
            .optional()?)
    }

    pub async fn delete(token: &str, db: &Database) -> anyhow::Result<bool> {
        let deleted = delete(sessions::table.find(token))
            .execute(&mut *db.connection().await)
            .await?;
        Ok(deleted == 1)
    }

    pub async fn user(&self, db: &Database) -> anyhow::Result<User> {
        User::by_id(self.user_id, &mut *db.connection().await)
            .await?
            .ok_or(anyhow!("This wasn't supposed to happen"))
    }

    fn expiry_cutoff() -> DateTime<Utc> {
        Utc::now() - Duration::days(SESSION_LIFETIME_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use diesel::insert_into;
    use diesel_async::RunQueryDsl;

    use super::{Session, SESSION_LIFETIME_DAYS};
    use crate::{schema::sessions, seed::tests::seeded, types::DbId};

    #[tokio::test]
    async fn sessions_round_trip() {
        let db = seeded().await;
        let session = Session::create(DbId::new(1), &db).await.unwrap();
        assert_eq!(session.token.len(), 60);

        let found = Session::by_token(&session.token, &db).await.unwrap();
        assert_eq!(found.as_ref().map(|found| &found.token), Some(&session.token));
        assert_eq!(session.user(&db).await.unwrap().name, "ann");

        assert!(Session::delete(&session.token, &db).await.unwrap());
        assert_eq!(Session::by_token(&session.token, &db).await.unwrap(), None);
        assert!(!Session::delete(&session.token, &db).await.unwrap());
    }

    #[tokio::test]
    async fn expired_sessions_are_pruned_on_lookup() {
        let db = seeded().await;
        let stale = Session {
            token: String::from("stale"),
            user_id: DbId::new(1),
            published: Utc::now() - Duration::days(SESSION_LIFETIME_DAYS + 1),
        };
        insert_into(sessions::table)
            .values(&stale)
            .execute(&mut *db.connection().await)
            .await
            .unwrap();
        let fresh = Session::create(DbId::new(1), &db).await.unwrap();

        assert_eq!(Session::by_token("stale", &db).await.unwrap(), None);
        assert!(!Session::delete("stale", &db).await.unwrap());
        assert!(Session::by_token(&fresh.token, &db).await.unwrap().is_some());
    }
}
