use anyhow::anyhow;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};
use tokio::sync::broadcast;

use super::MessageService;
use crate::{
    models::{Message, NewMessage, Post},
    schema::messages,
    subject::Snapshot,
    types::Counter,
    Database,
};

#[async_trait]
impl MessageService for Database {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<Message>> {
        self.messages.subscribe()
    }

    async fn emit_messages(&self) {
        match self.load_messages().await {
            Ok(messages) => {
                self.messages.next(&messages);
            }
            Err(err) => log::error!("Error loading messages, {:#?}", err),
        }
    }

    async fn create_message(&self, message: NewMessage) -> anyhow::Result<Message> {
        if message.msg.is_empty() {
            return Err(anyhow!("message body is empty"));
        }

        let mut conn = self.connection().await;
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            async move {
                let created = insert_into(messages::table)
                    .values(&message)
                    .returning(Message::as_returning())
                    .get_result(conn)
                    .await?;
                Post::adjust_counter(created.post, Counter::Messages, 1, conn).await?;
                Ok(created)
            }
            .scope_boxed()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use diesel_async::SimpleAsyncConnection;

    use crate::{
        models::{NewMessage, Post},
        seed::tests::seeded,
        services::MessageService,
        types::DbId,
    };

    fn new_message(post: i64, msg: &str) -> NewMessage {
        NewMessage {
            author: DbId::new(1),
            msg: msg.to_string(),
            post: DbId::new(post),
            like: 0,
            published: Utc::now(),
        }
    }

    async fn stored_post(db: &crate::Database, id: i64) -> Post {
        Post::by_id(DbId::new(id), &mut *db.connection().await)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn counts_each_created_message() {
        let db = seeded().await;
        let mut messages = MessageService::subscribe(&db);

        let first = db.create_message(new_message(2, "hello")).await.unwrap();
        let second = db.create_message(new_message(2, "again")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(stored_post(&db, 2).await.msg, 3);
        assert!(db.create_message(new_message(2, "")).await.is_err());
        assert_eq!(stored_post(&db, 2).await.msg, 3);

        db.emit_messages().await;
        let snapshot = messages.recv().await.unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[3].msg, "again");
    }

    #[tokio::test]
    async fn message_on_missing_post_is_not_stored() {
        let db = seeded().await;

        assert!(db.create_message(new_message(40, "lost")).await.is_err());
        assert_eq!(db.load_messages().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_count_leaves_no_message_behind() {
        let db = seeded().await;
        db.connection()
            .await
            .batch_execute(
                "CREATE TRIGGER posts_frozen BEFORE UPDATE ON posts \
                 BEGIN SELECT RAISE(ABORT, 'posts are frozen'); END;",
            )
            .await
            .unwrap();

        assert!(db.create_message(new_message(2, "orphan")).await.is_err());

        let stored = db
            .load_messages()
            .await
            .unwrap()
            .iter()
            .filter(|message| message.post == DbId::new(2))
            .count();
        assert_eq!(stored, 1);
        assert_eq!(stored_post(&db, 2).await.msg as usize, stored);
    }
}
