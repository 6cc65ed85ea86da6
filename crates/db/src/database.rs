use diesel::{connection::SimpleConnection, prelude::*, sqlite::SqliteConnection};
use diesel_async::{sync_connection_wrapper::SyncConnectionWrapper, RunQueryDsl};
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    migrations::run_migrations,
    models::{Like, Message, Post, User},
    schema::{likes, messages, posts, users},
    subject::Subject,
};

pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;

/// Database url of a private in-memory store.
pub const IN_MEMORY: &str = ":memory:";

/// The SQLite store shared by every data service.
///
/// SQLite takes one writer at a time, so all queries go through a single
/// connection.
pub struct Database {
    connection: Mutex<DbConnection>,
    pub(crate) posts: Subject<Post>,
    pub(crate) users: Subject<User>,
    pub(crate) messages: Subject<Message>,
    pub(crate) likes: Subject<Like>,
}

impl Database {
    /// Opens the database at `url`, creating it if needed, and runs pending
    /// migrations.
    pub async fn open(url: &str) -> anyhow::Result<Self> {
        let url = url.to_string();
        let connection = tokio::task::spawn_blocking(move || -> anyhow::Result<SqliteConnection> {
            let mut connection = SqliteConnection::establish(&url)?;
            connection.batch_execute("PRAGMA foreign_keys = ON;")?;
            run_migrations(&mut connection)?;
            log::info!("opened database {}", url);
            Ok(connection)
        })
        .await??;

        Ok(Database {
            connection: Mutex::new(SyncConnectionWrapper::new(connection)),
            posts: Subject::new(),
            users: Subject::new(),
            messages: Subject::new(),
            likes: Subject::new(),
        })
    }

    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::open(IN_MEMORY).await
    }

    pub async fn connection(&self) -> MutexGuard<'_, DbConnection> {
        self.connection.lock().await
    }

    pub async fn load_posts(&self) -> anyhow::Result<Vec<Post>> {
        Ok(posts::table
            .select(Post::as_select())
            .order(posts::id)
            .load(&mut *self.connection().await)
            .await?)
    }

    pub async fn load_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(users::table
            .select(User::as_select())
            .order(users::id)
            .load(&mut *self.connection().await)
            .await?)
    }

    pub async fn load_messages(&self) -> anyhow::Result<Vec<Message>> {
        Ok(messages::table
            .select(Message::as_select())
            .order(messages::id)
            .load(&mut *self.connection().await)
            .await?)
    }

    pub async fn load_likes(&self) -> anyhow::Result<Vec<Like>> {
        Ok(likes::table
            .select(Like::as_select())
            .order((likes::post, likes::author))
            .load(&mut *self.connection().await)
            .await?)
    }
}
