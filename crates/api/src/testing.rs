use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use db::{
    models::{Message, Post, Session, User},
    services::UserService,
    seed::Seed,
    types::DbId,
    Database,
};
use hyper::body::to_bytes;
use web::{config::Config, AppState};

use crate::routers;

pub const ANN: &str = "ann@example.com";
pub const BOB: &str = "bob@example.com";

fn user(id: i64, name: &str, email: &str) -> User {
    User {
        id: DbId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        password_encrypted: None,
        published: Utc::now(),
    }
}

fn post(id: i64, title: &str, msg: i32, age_hours: i64) -> Post {
    Post {
        id: DbId::new(id),
        author: DbId::new(0),
        title: title.to_string(),
        content: format!("{} body", title),
        like: 0,
        msg,
        published: Utc::now() - Duration::hours(age_hours),
    }
}

fn message(id: i64, post: i64, msg: &str) -> Message {
    Message {
        id: DbId::new(id),
        author: DbId::new(1),
        msg: msg.to_string(),
        post: DbId::new(post),
        like: 0,
        published: Utc::now(),
    }
}

/// Router over an in-memory store holding three posts by ann.
pub async fn app() -> (Router, Arc<AppState>) {
    let db = Database::in_memory().await.unwrap();
    db.import(&Seed {
        users: vec![user(0, "ann", ANN), user(1, "bob", BOB)],
        posts: vec![
            post(0, "Hello", 1, 3),
            post(1, "Quiet post", 0, 2),
            post(2, "Second post", 1, 1),
        ],
        messages: vec![
            message(0, 2, "first comment"),
            message(1, 0, "comment on another post"),
        ],
        likes: vec![],
    })
    .await
    .unwrap();
    let state = Arc::new(AppState::new(Arc::new(db), Config::default()));

    (routers::app(Arc::clone(&state)), state)
}

/// Creates a session for the user registered under `email`.
pub async fn sign_in(state: &AppState, email: &str) -> String {
    let user = state.services.users.by_email(email).await.unwrap().unwrap();
    Session::create(user.id, &state.db).await.unwrap().token
}

pub async fn stored_post(state: &AppState, id: i64) -> Post {
    Post::by_id(DbId::new(id), &mut *state.db.connection().await)
        .await
        .unwrap()
        .unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut request = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("token={}", token));
    }
    request.body(Body::empty()).unwrap()
}

/// A browser form post, signed in through the session cookie.
pub fn form(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("token={}", token));
    }
    request.body(Body::from(body.to_string())).unwrap()
}

/// An API call, signed in through a bearer token.
pub fn json(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    request.body(Body::from(body.to_string())).unwrap()
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
