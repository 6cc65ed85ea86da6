use chrono::{DateTime, Utc};
use db::{models::Post, types::DbId};
use serde::Serialize;

use super::state::{PostState, UserIdState, ViewState};
use crate::form::MessageForm;

/// Everything the single-post page renders, taken at one point in time.
#[derive(Serialize, Debug, Clone)]
pub struct PostPage {
    pub route_id: String,
    pub post: Option<Post>,
    pub author_name: Option<String>,
    pub loading: bool,
    pub not_found: bool,
    pub messages: Vec<MessageEntry>,
    pub liked: bool,
    pub signed_in: bool,
    pub form: MessageForm,
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct MessageEntry {
    pub id: DbId,
    pub author: DbId,
    pub author_name: Option<String>,
    pub msg: String,
    pub published: DateTime<Utc>,
}

impl PostPage {
    pub(crate) fn build(state: &ViewState) -> Self {
        let post = match &state.post {
            PostState::Loaded(post) => Some(post.clone()),
            _ => None,
        };
        let user_id = match state.user_id {
            UserIdState::Resolved(id) => Some(id),
            _ => None,
        };

        PostPage {
            route_id: state.route_id.clone(),
            author_name: post
                .as_ref()
                .and_then(|post| state.user_name(post.author))
                .map(str::to_string),
            post,
            loading: state.post == PostState::Loading,
            not_found: state.post == PostState::NotFound,
            messages: state
                .messages
                .iter()
                .map(|message| MessageEntry {
                    id: message.id,
                    author: message.author,
                    author_name: state.user_name(message.author).map(str::to_string),
                    msg: message.msg.clone(),
                    published: message.published,
                })
                .collect(),
            liked: user_id
                .map(|id| state.like_by(id).is_some())
                .unwrap_or(false),
            signed_in: user_id.is_some(),
            form: state.form.clone(),
            error: state.error.clone(),
        }
    }
}
