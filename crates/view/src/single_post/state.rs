use std::sync::Arc;

use db::{
    models::{Like, Message, Post, User},
    types::{Counter, DbId},
};

use crate::{error::ViewError, form::MessageForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostState {
    Loading,
    Loaded(Post),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIdState {
    Pending,
    Resolved(DbId),
    Unauthenticated,
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Received {
    pub users: bool,
    pub posts: bool,
    pub messages: bool,
    pub likes: bool,
}

#[derive(Debug)]
pub(crate) struct ViewState {
    pub route_id: String,
    /// `None` when the route id is not a valid id.
    pub post_id: Option<DbId>,
    pub post: PostState,
    pub user_id: UserIdState,
    pub users: Vec<User>,
    pub messages: Vec<Message>,
    pub likes: Vec<Like>,
    pub form: MessageForm,
    pub error: Option<String>,
    pub received: Received,
}

impl ViewState {
    pub fn new(route_id: &str) -> Self {
        let post_id = route_id.parse::<DbId>().ok();
        ViewState {
            route_id: route_id.to_string(),
            post_id,
            post: match post_id {
                Some(_) => PostState::Loading,
                None => PostState::NotFound,
            },
            user_id: UserIdState::Pending,
            users: Vec::new(),
            messages: Vec::new(),
            likes: Vec::new(),
            form: MessageForm::default(),
            error: None,
            received: Received::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        let received = self.received;
        received.users
            && received.posts
            && received.messages
            && received.likes
            && self.user_id != UserIdState::Pending
    }

    pub fn apply_users(&mut self, users: Arc<[User]>) {
        self.users = users.to_vec();
        self.received.users = true;
    }

    pub fn apply_posts(&mut self, posts: Arc<[Post]>) {
        self.post = match self.post_id {
            Some(id) => match posts.iter().find(|post| post.id == id) {
                Some(post) => PostState::Loaded(post.clone()),
                None => PostState::NotFound,
            },
            None => PostState::NotFound,
        };
        self.received.posts = true;
    }

    /// Each snapshot replaces the list, so repeated emissions never duplicate.
    pub fn apply_messages(&mut self, messages: Arc<[Message]>) {
        self.messages = match self.post_id {
            Some(id) => messages
                .iter()
                .filter(|message| message.post == id)
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        self.received.messages = true;
    }

    pub fn apply_likes(&mut self, likes: Arc<[Like]>) {
        self.likes = match self.post_id {
            Some(id) => likes.iter().filter(|like| like.post == id).cloned().collect(),
            None => Vec::new(),
        };
        self.received.likes = true;
    }

    pub fn user(&self) -> Result<DbId, ViewError> {
        match self.user_id {
            UserIdState::Resolved(id) => Ok(id),
            UserIdState::Pending => Err(ViewError::NotLoaded),
            UserIdState::Unauthenticated => Err(ViewError::Unauthenticated),
        }
    }

    pub fn post(&self) -> Result<&Post, ViewError> {
        match &self.post {
            PostState::Loaded(post) => Ok(post),
            PostState::Loading => Err(ViewError::NotLoaded),
            PostState::NotFound => Err(ViewError::PostNotFound),
        }
    }

    pub fn like_by(&self, author: DbId) -> Option<&Like> {
        self.likes.iter().find(|like| like.author == author)
    }

    pub fn adjust_post(&mut self, counter: Counter, delta: i32) {
        if let PostState::Loaded(post) = &mut self.post {
            post.adjust(counter, delta);
        }
    }

    pub fn user_name(&self, id: DbId) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .map(|user| user.name.as_str())
    }
}
