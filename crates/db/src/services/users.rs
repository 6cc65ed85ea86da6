use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use diesel_async::RunQueryDsl;
use tokio::sync::broadcast;

use super::UserService;
use crate::{models::User, schema::users, subject::Snapshot, types::DbId, Database};

#[async_trait]
impl UserService for Database {
    fn subscribe(&self) -> broadcast::Receiver<Snapshot<User>> {
        self.users.subscribe()
    }

    async fn emit_users(&self) {
        match self.load_users().await {
            Ok(users) => {
                self.users.next(&users);
            }
            Err(err) => log::error!("Error loading users, {:#?}", err),
        }
    }

    async fn user_id(&self, email: &str) -> anyhow::Result<Option<DbId>> {
        Ok(self.by_email(email).await?.map(|user| user.id))
    }

    async fn by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        User::by_email(email, &mut *self.connection().await).await
    }

    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> anyhow::Result<User> {
        let name = name.trim().to_string();
        let email = email.trim().to_lowercase();
        if name.is_empty() || !email.contains('@') {
            return Err(anyhow!("a name and a valid email are required"));
        }

        let password_hash = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);

            let argon2 = Argon2::default();

            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|f| f.to_string())
        })
        .await?;

        let password_hash = match password_hash {
            Ok(hash) => hash,
            Err(_) => return Err(anyhow!("password hashing failed")),
        };

        let created = insert_into(users::table)
            .values((
                users::name.eq(name),
                users::email.eq(&email),
                users::password_encrypted.eq(Some(password_hash)),
                users::published.eq(Utc::now()),
            ))
            .returning(User::as_returning())
            .get_result(&mut *self.connection().await)
            .await;

        match created {
            Ok(user) => Ok(user),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(anyhow!("email {} is already registered", email))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    use crate::{seed::tests::seeded, services::UserService, Database};

    #[tokio::test]
    async fn registers_and_resolves_by_email() {
        let db = Database::in_memory().await.unwrap();
        let carol = db
            .register(
                String::from("carol"),
                String::from(" Carol@Example.com "),
                String::from("hunter2"),
            )
            .await
            .unwrap();
        assert_eq!(carol.email, "carol@example.com");

        let hash = carol.password_encrypted.clone().unwrap();
        let parsed_hash = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"hunter2", &parsed_hash)
            .is_ok());

        assert_eq!(
            db.user_id("CAROL@example.com").await.unwrap(),
            Some(carol.id)
        );
        assert_eq!(db.user_id("dave@example.com").await.unwrap(), None);

        let duplicate = db
            .register(
                String::from("carol2"),
                String::from("carol@example.com"),
                String::from("x"),
            )
            .await;
        assert!(duplicate.is_err());
        assert_eq!(db.load_users().await.unwrap().len(), 1);
        assert!(db
            .register(String::from("dave"), String::from("dave"), String::from("x"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn emits_every_user() {
        let db = seeded().await;
        let mut users = UserService::subscribe(&db);

        db.emit_users().await;
        let snapshot = users.recv().await.unwrap();
        assert_eq!(
            snapshot.iter().map(|user| user.name.as_str()).collect::<Vec<_>>(),
            vec!["ann", "bob"]
        );
    }
}
