use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use db::models::Session;
use view::Identity;
use web::AppState;

use crate::error::ApiError;

pub const TOKEN_COOKIE: &str = "token";

/// Session token from the `token` cookie, else from a bearer header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

async fn resolve(state: &AppState, token: Option<String>) -> (Option<Session>, Identity) {
    let Some(token) = token else {
        return (None, Identity::anonymous());
    };

    let session = match Session::by_token(&token, &state.db).await {
        Ok(Some(session)) => session,
        Ok(None) => return (None, Identity::anonymous()),
        Err(err) => {
            log::error!("Error looking up session, {:#?}", err);
            return (None, Identity::anonymous());
        }
    };

    match session.user(&state.db).await {
        Ok(user) => (Some(session), Identity::signed_in(user.email)),
        Err(err) => {
            log::warn!("session without a user, {:#}", err);
            (None, Identity::anonymous())
        }
    }
}

/// Attaches `Option<Session>` and an [`Identity`] to every request.
pub async fn optional_auth_middleware<B>(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Response {
    let token = session_token(&jar, request.headers());
    let (session, identity) = resolve(&state, token).await;
    request.extensions_mut().insert(session);
    request.extensions_mut().insert(identity);

    next.run(request).await
}

/// Like [`optional_auth_middleware`], but answers 401 without a session.
pub async fn auth_middleware<B>(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let token = session_token(&jar, request.headers());
    match resolve(&state, token).await {
        (Some(session), identity) => {
            request.extensions_mut().insert(session);
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        (None, _) => Err(ApiError::unauthenticated()),
    }
}
