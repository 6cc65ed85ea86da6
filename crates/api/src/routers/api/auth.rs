use std::sync::Arc;

use axum::{
    extract::State,
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use db::models::Session;
use serde::Deserialize;
use web::{errors::AppError, AppState};

use crate::{
    auth_middleware::auth_middleware, common::users::verify_credentials, entities::Token,
    error::ApiError,
};

#[derive(Deserialize)]
pub struct TokenBody {
    email: String,
    password: String,
}

pub async fn http_post_token(
    state: State<Arc<AppState>>,
    Json(body): Json<TokenBody>,
) -> Result<Response, AppError> {
    match verify_credentials(&state, &body.email, body.password).await? {
        Some(user) => {
            let session = Session::create(user.id, &state.db).await?;
            Ok(Json(Token::from(session)).into_response())
        }
        None => Ok(ApiError::new("Invalid email or password", StatusCode::UNAUTHORIZED)
            .into_response()),
    }
}

pub async fn http_post_revoke(
    state: State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    Session::delete(&session.token, &state.db).await?;
    Ok(Json(serde_json::json!({})))
}

pub fn auth(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/auth/token", post(http_post_token))
        .route(
            "/api/v1/auth/revoke",
            post(http_post_revoke.layer(from_fn_with_state(Arc::clone(state), auth_middleware))),
        )
}
