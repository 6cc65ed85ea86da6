use argon2::{Argon2, PasswordHash, PasswordVerifier};
use db::{models::User, services::UserService};
use web::AppState;

/// The user registered under `email`, if `password` matches theirs.
pub async fn verify_credentials(
    state: &AppState,
    email: &str,
    password: String,
) -> anyhow::Result<Option<User>> {
    let Some(user) = state.services.users.by_email(email).await? else {
        return Ok(None);
    };
    let Some(hash) = user.password_encrypted.clone() else {
        return Ok(None);
    };

    let verified = tokio::task::spawn_blocking(move || {
        PasswordHash::new(&hash)
            .map(|parsed_hash| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok()
            })
            .unwrap_or(false)
    })
    .await?;

    Ok(verified.then_some(user))
}
