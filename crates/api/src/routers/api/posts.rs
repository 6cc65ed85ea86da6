use std::sync::Arc;

use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use db::{
    models::{NewPost, Session},
    services::PostService,
};
use serde::Deserialize;
use view::{form::MessageForm, navigation::Navigator, Identity};
use web::{errors::AppError, AppState};

use crate::{
    auth_middleware::{auth_middleware, optional_auth_middleware},
    common::views::open_post,
    entities::LikeResult,
    error::ApiError,
    navigator::HttpNavigator,
};

fn navigator() -> Arc<dyn Navigator> {
    Arc::new(HttpNavigator::new(None))
}

pub async fn http_get_post(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, AppError> {
    let mut view = open_post(&state, identity, navigator(), &id).await;
    let page = view.page().await;
    view.teardown();

    if page.not_found {
        return Ok(ApiError::not_found().into_response());
    }
    Ok(Json(page).into_response())
}

pub async fn http_post_like(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, AppError> {
    let mut view = open_post(&state, identity, navigator(), &id).await;

    let response = match view.toggle_like().await {
        Ok(outcome) => Json(LikeResult {
            outcome,
            page: view.page().await,
        })
        .into_response(),
        Err(err) => ApiError::from(err).into_response(),
    };

    view.teardown();
    Ok(response)
}

#[derive(Deserialize)]
pub struct MessageBody {
    msg: String,
    #[serde(default)]
    like: i32,
}

pub async fn http_post_message(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<MessageBody>,
) -> Result<Response, AppError> {
    let mut view = open_post(&state, identity, navigator(), &id).await;
    view.set_form(MessageForm {
        msg: body.msg,
        like: body.like,
        ..Default::default()
    })
    .await;

    let response = match view.submit_comment().await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    };

    view.teardown();
    Ok(response)
}

#[derive(Deserialize)]
pub struct NewPostBody {
    title: String,
    #[serde(default)]
    content: String,
}

pub async fn http_post_create(
    state: State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<NewPostBody>,
) -> Result<Response, AppError> {
    let created = state
        .services
        .posts
        .create_post(NewPost {
            author: session.user_id,
            title: body.title,
            content: body.content,
        })
        .await;

    match created {
        Ok(post) => {
            state.services.posts.emit_posts().await;
            log::info!("user {} created post {}", session.user_id, post.id);
            Ok((StatusCode::CREATED, Json(post)).into_response())
        }
        Err(err) => Ok(ApiError::new_with_description(
            "Validation failed",
            &err.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .into_response()),
    }
}

pub fn posts(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/posts",
            post(http_post_create.layer(from_fn_with_state(Arc::clone(state), auth_middleware))),
        )
        .route(
            "/api/v1/posts/:id",
            get(http_get_post.layer(from_fn_with_state(
                Arc::clone(state),
                optional_auth_middleware,
            ))),
        )
        .route(
            "/api/v1/posts/:id/like",
            post(http_post_like.layer(from_fn_with_state(Arc::clone(state), auth_middleware))),
        )
        .route(
            "/api/v1/posts/:id/messages",
            post(
                http_post_message.layer(from_fn_with_state(Arc::clone(state), auth_middleware)),
            ),
        )
}
