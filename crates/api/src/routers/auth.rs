use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use db::{models::Session, services::UserService};
use serde::Deserialize;
use tera::Context;
use web::{errors::AppError, AppState};

use crate::{
    auth_middleware::TOKEN_COOKIE, common::users::verify_credentials, navigator::is_local_path,
    TEMPLATES,
};

#[derive(Deserialize)]
pub struct SignInQuery {
    redirect_url: Option<String>,
}

pub async fn http_get_sign_in(
    state: State<Arc<AppState>>,
    Extension(session): Extension<Option<Session>>,
    Query(query): Query<SignInQuery>,
) -> Result<Response, AppError> {
    let redirect_url = redirect_target(query.redirect_url);
    if session.is_some() {
        return Ok(Redirect::to(&redirect_url).into_response());
    }

    render_sign_in(&state, &redirect_url, None, StatusCode::OK)
}

#[derive(Deserialize)]
pub struct SignInBody {
    email: String,
    password: String,
    redirect_url: Option<String>,
}

pub async fn http_post_sign_in(
    state: State<Arc<AppState>>,
    jar: CookieJar,
    Extension(session): Extension<Option<Session>>,
    Form(body): Form<SignInBody>,
) -> Result<Response, AppError> {
    let redirect_url = redirect_target(body.redirect_url);
    if session.is_some() {
        return Ok(Redirect::to(&redirect_url).into_response());
    }

    match verify_credentials(&state, &body.email, body.password).await? {
        Some(user) => {
            let session = Session::create(user.id, &state.db).await?;
            log::info!("user {} signed in", user.id);
            Ok((
                jar.add(session_cookie(&state, session.token)),
                Redirect::to(&redirect_url),
            )
                .into_response())
        }
        None => render_sign_in(
            &state,
            &redirect_url,
            Some("Invalid email or password"),
            StatusCode::UNAUTHORIZED,
        ),
    }
}

#[derive(Deserialize)]
pub struct SignUpBody {
    name: String,
    email: String,
    password: String,
    redirect_url: Option<String>,
}

pub async fn http_post_sign_up(
    state: State<Arc<AppState>>,
    jar: CookieJar,
    Form(body): Form<SignUpBody>,
) -> Result<Response, AppError> {
    let redirect_url = redirect_target(body.redirect_url);
    if body.password.is_empty() {
        return render_sign_in(
            &state,
            &redirect_url,
            Some("A password is required"),
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    }

    let user = match state
        .services
        .users
        .register(body.name, body.email, body.password)
        .await
    {
        Ok(user) => user,
        Err(err) => {
            return render_sign_in(
                &state,
                &redirect_url,
                Some(&err.to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        }
    };

    state.services.users.emit_users().await;
    let session = Session::create(user.id, &state.db).await?;
    log::info!("user {} registered", user.id);
    Ok((
        jar.add(session_cookie(&state, session.token)),
        Redirect::to(&redirect_url),
    )
        .into_response())
}

pub async fn http_post_sign_out(
    state: State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = jar.get(TOKEN_COOKIE) {
        Session::delete(token.value(), &state.db).await?;
    }

    Ok((
        jar.remove(Cookie::build(TOKEN_COOKIE, "").path("/").finish()),
        Redirect::to("/"),
    ))
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(state.config.web.secure_cookies)
        .finish()
}

fn redirect_target(redirect_url: Option<String>) -> String {
    redirect_url
        .filter(|url| is_local_path(url))
        .unwrap_or(String::from("/"))
}

fn render_sign_in(
    state: &AppState,
    redirect_url: &str,
    error: Option<&str>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("title", &state.config.site.title);
    context.insert("redirect_url", redirect_url);
    context.insert("error", &error);
    Ok((status, Html(TEMPLATES.render("sign_in.html", &context)?)).into_response())
}

pub fn auth() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/sign_in", get(http_get_sign_in).post(http_post_sign_in))
        .route("/auth/sign_up", post(http_post_sign_up))
        .route("/auth/sign_out", post(http_post_sign_out))
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use db::{models::Session, services::UserService};
    use tower::ServiceExt;

    use crate::testing;

    #[tokio::test]
    async fn sign_in_sets_session_cookie() {
        let (app, state) = testing::app().await;
        state
            .services
            .users
            .register(
                String::from("cid"),
                String::from("cid@example.com"),
                String::from("correct horse"),
            )
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(testing::form(
                "/auth/sign_in",
                "email=cid%40example.com&password=wrong",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(testing::form(
                "/auth/sign_in",
                "email=cid%40example.com&password=correct+horse&redirect_url=%2Fpost%2F2",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(testing::location(&response), "/post/2");
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("token="));
        let token = cookie["token=".len()..].split(';').next().unwrap();
        let session = Session::by_token(token, &state.db).await.unwrap().unwrap();
        assert_eq!(session.user(&state.db).await.unwrap().name, "cid");
    }

    #[tokio::test]
    async fn sign_up_rejects_taken_email() {
        let (app, _) = testing::app().await;

        let response = app
            .oneshot(testing::form(
                "/auth/sign_up",
                "name=ann&email=ann%40example.com&password=pw",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn sign_out_ends_the_session() {
        let (app, state) = testing::app().await;
        let token = testing::sign_in(&state, testing::ANN).await;

        let response = app
            .oneshot(testing::form("/auth/sign_out", "", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(Session::by_token(&token, &state.db).await.unwrap().is_none());
    }
}
