use db::models::Session;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub created_at: i64,
}

impl From<Session> for Token {
    fn from(session: Session) -> Self {
        Token {
            access_token: session.token,
            token_type: String::from("Bearer"),
            created_at: session.published.timestamp(),
        }
    }
}
