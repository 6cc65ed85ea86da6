use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::Deserialize;
use tera::Context;
use url::{form_urlencoded::byte_serialize, Url};
use view::{
    form::MessageForm,
    navigation::{Navigator, Route},
    Identity, PostPage, SinglePostView, ViewError,
};
use web::{errors::AppError, AppState};

use crate::{common::views::open_post, navigator::HttpNavigator, TEMPLATES};

pub async fn http_get_index(state: State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let mut posts = state.db.load_posts().await?;
    posts.sort_by(|a, b| b.published.cmp(&a.published));

    let mut context = Context::new();
    context.insert("title", &state.config.site.title);
    context.insert("posts", &posts);
    Ok(Html(TEMPLATES.render("index.html", &context)?))
}

pub async fn http_get_post(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let navigator = Arc::new(HttpNavigator::new(None));
    let mut view = open_post(&state, identity, navigator, &id).await;
    let page = view.page().await;
    view.teardown();

    render_page(&state, &page, previous_page(&headers), StatusCode::OK)
}

pub async fn http_post_like(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, AppError> {
    let navigator = Arc::new(HttpNavigator::new(None));
    let mut view = open_post(&state, identity, navigator, &id).await;

    let response = match view.toggle_like().await {
        Ok(_) => reload(&view, &id).await,
        Err(err) => failure(&state, &view, err, &id).await?,
    };

    view.teardown();
    Ok(response)
}

#[derive(Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    msg: String,
    like: Option<i32>,
}

pub async fn http_post_message(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
    Form(body): Form<MessageBody>,
) -> Result<Response, AppError> {
    let navigator = Arc::new(HttpNavigator::new(None));
    let mut view = open_post(&state, identity, navigator.clone(), &id).await;
    view.set_form(MessageForm {
        msg: body.msg,
        like: body.like.unwrap_or(0),
        ..Default::default()
    })
    .await;

    let response = match view.submit_comment().await {
        Ok(_) => match navigator.redirect() {
            Some(redirect) => redirect.into_response(),
            None => reload(&view, &id).await,
        },
        Err(err) => failure(&state, &view, err, &id).await?,
    };

    view.teardown();
    Ok(response)
}

#[derive(Deserialize)]
pub struct BackQuery {
    to: Option<String>,
}

/// Going back needs no page data, so no view is bound.
pub async fn http_get_back(Query(query): Query<BackQuery>) -> Response {
    let navigator = HttpNavigator::new(query.to);
    navigator.back();

    navigator
        .redirect()
        .unwrap_or_else(|| Redirect::to(&Route::Home.path()))
        .into_response()
}

async fn reload(view: &SinglePostView, id: &str) -> Response {
    let path = match view.page().await.post {
        Some(post) => Route::Post(post.id).path(),
        None => format!("/post/{}", encode(id)),
    };
    Redirect::to(&path).into_response()
}

async fn failure(
    state: &AppState,
    view: &SinglePostView,
    err: ViewError,
    id: &str,
) -> Result<Response, AppError> {
    let status = match &err {
        ViewError::Unauthenticated => {
            let back = format!("/post/{}", id);
            return Ok(Redirect::to(&format!(
                "{}?redirect_url={}",
                Route::SignIn.path(),
                encode(&back)
            ))
            .into_response());
        }
        ViewError::PostNotFound => StatusCode::NOT_FOUND,
        ViewError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        ViewError::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ViewError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    render_page(state, &view.page().await, None, status)
}

fn render_page(
    state: &AppState,
    page: &PostPage,
    previous: Option<String>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let status = if page.not_found {
        StatusCode::NOT_FOUND
    } else {
        status
    };

    let back = match previous {
        Some(previous) => format!("/post/{}/back?to={}", encode(&page.route_id), encode(&previous)),
        None => format!("/post/{}/back", encode(&page.route_id)),
    };

    let mut context = Context::new();
    context.insert("title", &state.config.site.title);
    context.insert("page", page);
    context.insert("back", &back);
    Ok((status, Html(TEMPLATES.render("single_post.html", &context)?)).into_response())
}

/// Path of the referring page, when it is on this site.
fn previous_page(headers: &HeaderMap) -> Option<String> {
    let referer = Url::parse(headers.get(header::REFERER)?.to_str().ok()?).ok()?;
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let host = host.split(':').next().unwrap_or(host);
    if referer.host_str() != Some(host) {
        return None;
    }

    Some(match referer.query() {
        Some(query) => format!("{}?{}", referer.path(), query),
        None => referer.path().to_string(),
    })
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

pub fn posts() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(http_get_index))
        .route("/post/:id", get(http_get_post))
        .route("/post/:id/like", post(http_post_like))
        .route("/post/:id/messages", post(http_post_message))
        .route("/post/:id/back", get(http_get_back))
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
    use db::types::DbId;
    use hyper::body::to_bytes;
    use tower::ServiceExt;

    use super::previous_page;
    use crate::testing;

    #[test]
    fn previous_page_must_be_local() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com:8081"));
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("http://example.com:8081/post/1?x=1"),
        );
        assert_eq!(previous_page(&headers).as_deref(), Some("/post/1?x=1"));

        headers.insert(
            header::REFERER,
            HeaderValue::from_static("http://elsewhere.example/post/1"),
        );
        assert_eq!(previous_page(&headers), None);
    }

    #[tokio::test]
    async fn renders_post_page() {
        let (app, _) = testing::app().await;

        let response = app.oneshot(testing::get("/post/2", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Second post"));
        assert!(body.contains("first comment"));
        assert!(!body.contains("comment on another post"));
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let (app, _) = testing::app().await;

        let response = app
            .clone()
            .oneshot(testing::get("/post/42", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(testing::get("/post/nope", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn like_requires_sign_in() {
        let (app, _) = testing::app().await;

        let response = app
            .oneshot(testing::form("/post/2/like", "", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            testing::location(&response),
            "/auth/sign_in?redirect_url=%2Fpost%2F2"
        );
    }

    #[tokio::test]
    async fn like_toggles_and_reloads() {
        let (app, state) = testing::app().await;
        let token = testing::sign_in(&state, testing::ANN).await;

        let response = app
            .clone()
            .oneshot(testing::form("/post/2/like", "", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(testing::location(&response), "/post/2");
        assert_eq!(testing::stored_post(&state, 2).await.like, 1);

        app.oneshot(testing::form("/post/2/like", "", Some(&token)))
            .await
            .unwrap();
        assert_eq!(testing::stored_post(&state, 2).await.like, 0);
        assert!(state.db.load_likes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn posting_a_message_redirects_to_the_post() {
        let (app, state) = testing::app().await;
        let token = testing::sign_in(&state, testing::ANN).await;

        let response = app
            .oneshot(testing::form(
                "/post/2/messages",
                "msg=hello+there&like=0",
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(testing::location(&response), "/post/2");

        let messages = state.db.load_messages().await.unwrap();
        let message = messages.last().unwrap();
        assert_eq!(message.msg, "hello there");
        assert_eq!(message.post, DbId::new(2));
        assert_eq!(testing::stored_post(&state, 2).await.msg, 2);
    }

    #[tokio::test]
    async fn empty_message_is_unprocessable() {
        let (app, state) = testing::app().await;
        let token = testing::sign_in(&state, testing::ANN).await;

        let response = app
            .oneshot(testing::form("/post/2/messages", "msg=", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(testing::stored_post(&state, 2).await.msg, 1);
        assert_eq!(state.db.load_messages().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn back_follows_local_targets_only() {
        let (app, _) = testing::app().await;

        let response = app
            .clone()
            .oneshot(testing::get("/post/2/back?to=%2Fpost%2F0", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(testing::location(&response), "/post/0");

        let response = app
            .clone()
            .oneshot(testing::get(
                "/post/2/back?to=https%3A%2F%2Felsewhere.example%2F",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(testing::location(&response), "/");

        let response = app
            .oneshot(testing::get("/post/2/back", None))
            .await
            .unwrap();
        assert_eq!(testing::location(&response), "/");
    }

    #[tokio::test]
    async fn back_does_not_load_the_post() {
        let (app, _) = testing::app().await;

        let response = app
            .oneshot(testing::get("/post/nope/back?to=%2Fpost%2F0", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(testing::location(&response), "/post/0");
    }
}
