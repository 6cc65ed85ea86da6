//! The single-post page: one post, its messages and its likes.

mod page;
mod state;

use std::sync::Arc;

use chrono::Utc;
use db::{
    models::{Like, Message, NewMessage},
    subject::Snapshot,
    types::Counter,
};
use serde::Serialize;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    watch, Mutex,
};

pub use page::{MessageEntry, PostPage};
pub use state::{PostState, UserIdState};

use self::state::ViewState;
use crate::{
    error::ViewError,
    form::MessageForm,
    identity::Identity,
    navigation::{Navigator, Route},
    services::Services,
    subscriptions::SubscriptionGroup,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

struct Shared {
    state: Mutex<ViewState>,
    revision: watch::Sender<u64>,
}

impl Shared {
    /// Every state change bumps the revision so waiters can observe it.
    async fn update<R>(&self, change: impl FnOnce(&mut ViewState) -> R) -> R {
        let result = {
            let mut state = self.state.lock().await;
            change(&mut state)
        };
        self.revision.send_modify(|revision| *revision += 1);
        result
    }
}

pub struct SinglePostView {
    services: Services,
    navigator: Arc<dyn Navigator>,
    shared: Arc<Shared>,
    subscriptions: SubscriptionGroup,
}

impl SinglePostView {
    /// Binds a new view to the post named by `route_id`.
    ///
    /// Every stream is subscribed before its service is asked to emit, so the
    /// first snapshot of each is never missed.
    pub async fn initialize(
        services: Services,
        identity: Identity,
        navigator: Arc<dyn Navigator>,
        route_id: &str,
    ) -> Self {
        navigator.scroll_to_top();

        let (revision, _) = watch::channel(0);
        let mut view = SinglePostView {
            services,
            navigator,
            shared: Arc::new(Shared {
                state: Mutex::new(ViewState::new(route_id)),
                revision,
            }),
            subscriptions: SubscriptionGroup::new(),
        };

        let users = view.services.users.subscribe();
        view.bind(users, ViewState::apply_users);
        view.services.users.emit_users().await;

        view.resolve_user(identity).await;

        let posts = view.services.posts.subscribe();
        view.bind(posts, ViewState::apply_posts);
        view.services.posts.emit_posts().await;

        let messages = view.services.messages.subscribe();
        view.bind(messages, ViewState::apply_messages);
        view.services.messages.emit_messages().await;

        let likes = view.services.likes.subscribe();
        view.bind(likes, ViewState::apply_likes);
        view.services.likes.emit_likes().await;

        log::debug!("single post view bound to route id {:?}", route_id);
        view
    }

    fn bind<T>(
        &mut self,
        mut receiver: broadcast::Receiver<Snapshot<T>>,
        apply: fn(&mut ViewState, Snapshot<T>),
    ) where
        T: Send + Sync + 'static,
    {
        let shared = Arc::clone(&self.shared);
        self.subscriptions.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(snapshot) => shared.update(|state| apply(state, snapshot)).await,
                    Err(RecvError::Lagged(skipped)) => {
                        log::debug!("view skipped {} stale snapshots", skipped)
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        });
    }

    async fn resolve_user(&mut self, identity: Identity) {
        let Some(email) = identity.email().map(str::to_string) else {
            self.shared
                .update(|state| state.user_id = UserIdState::Unauthenticated)
                .await;
            return;
        };

        let users = Arc::clone(&self.services.users);
        let shared = Arc::clone(&self.shared);
        self.subscriptions.spawn(async move {
            let resolved = match users.user_id(&email).await {
                Ok(Some(id)) => UserIdState::Resolved(id),
                Ok(None) => {
                    log::warn!("no user registered with email {}", email);
                    UserIdState::Unauthenticated
                }
                Err(err) => {
                    log::error!("Error resolving user {}, {:#?}", email, err);
                    UserIdState::Unauthenticated
                }
            };
            shared.update(|state| state.user_id = resolved).await;
        });
    }

    /// Waits until every stream delivered a snapshot and the user is resolved.
    pub async fn ready(&self) {
        self.wait_until(|state, _| state.is_ready()).await
    }

    pub fn revision(&self) -> u64 {
        *self.shared.revision.borrow()
    }

    pub async fn wait_for_revision(&self, revision: u64) {
        self.wait_until(|_, current| current >= revision).await
    }

    async fn wait_until(&self, done: impl Fn(&ViewState, u64) -> bool) {
        let mut revision = self.shared.revision.subscribe();
        loop {
            let current = *revision.borrow_and_update();
            if done(&*self.shared.state.lock().await, current) {
                return;
            }
            if revision.changed().await.is_err() {
                return;
            }
        }
    }

    pub async fn page(&self) -> PostPage {
        PostPage::build(&*self.shared.state.lock().await)
    }

    pub async fn post_state(&self) -> PostState {
        self.shared.state.lock().await.post.clone()
    }

    pub async fn user_id(&self) -> UserIdState {
        self.shared.state.lock().await.user_id
    }

    pub async fn set_form(&self, form: MessageForm) {
        self.shared.update(|state| state.form = form).await
    }

    /// Likes the post for the current user, or takes their like back.
    ///
    /// The page changes first. When the service fails the like list and the
    /// counter go back to what they were and the error is recorded.
    pub async fn toggle_like(&self) -> Result<LikeOutcome, ViewError> {
        let (author, post_id, existing) = self
            .shared
            .update(|state| {
                state.error = None;
                let author = state.user()?;
                let post_id = state.post()?.id;
                Ok::<_, ViewError>((author, post_id, state.like_by(author).cloned()))
            })
            .await?;

        let outcome = match existing {
            None => {
                let like = Like::new(author, post_id);
                let local = like.clone();
                self.shared
                    .update(|state| {
                        state.likes.push(local);
                        state.adjust_post(Counter::Likes, 1);
                    })
                    .await;

                match self.services.likes.add_like(like.clone()).await {
                    Ok(true) => {}
                    // Already stored, so the stored counter already has it.
                    Ok(false) => {
                        self.shared
                            .update(|state| state.adjust_post(Counter::Likes, -1))
                            .await
                    }
                    Err(err) => {
                        self.shared
                            .update(|state| {
                                state.likes.retain(|other| !other.same_as(&like));
                                state.adjust_post(Counter::Likes, -1);
                            })
                            .await;
                        return Err(self.report(err).await);
                    }
                }
                LikeOutcome::Liked
            }
            Some(like) => {
                self.shared
                    .update(|state| {
                        state.likes.retain(|other| !other.same_as(&like));
                        state.adjust_post(Counter::Likes, -1);
                    })
                    .await;

                match self.services.likes.remove_like(&like).await {
                    Ok(true) => {}
                    Ok(false) => {
                        self.shared
                            .update(|state| state.adjust_post(Counter::Likes, 1))
                            .await
                    }
                    Err(err) => {
                        self.shared
                            .update(|state| {
                                state.likes.push(like);
                                state.adjust_post(Counter::Likes, 1);
                            })
                            .await;
                        return Err(self.report(err).await);
                    }
                }
                LikeOutcome::Unliked
            }
        };

        self.services.posts.emit_posts().await;
        self.services.likes.emit_likes().await;
        log::debug!("user {} {:?} post {}", author, outcome, post_id);
        Ok(outcome)
    }

    /// Posts the form as a new message and reloads the post.
    ///
    /// The message and its count are stored together. When that fails the
    /// local counter is restored and nothing was stored.
    pub async fn submit_comment(&self) -> Result<Message, ViewError> {
        let (author, post_id, form) = self
            .shared
            .update(|state| {
                state.error = None;
                if let Err(err) = state.form.validate() {
                    state.error = Some(err.to_string());
                    return Err(ViewError::from(err));
                }
                Ok::<_, ViewError>((state.user()?, state.post()?.id, state.form.clone()))
            })
            .await?;

        let message = NewMessage {
            author,
            msg: form.msg,
            post: post_id,
            like: form.like,
            published: Utc::now(),
        };
        self.shared
            .update(|state| state.adjust_post(Counter::Messages, 1))
            .await;

        let message = match self.services.messages.create_message(message).await {
            Ok(message) => message,
            Err(err) => {
                self.shared
                    .update(|state| state.adjust_post(Counter::Messages, -1))
                    .await;
                return Err(self.report(err).await);
            }
        };

        self.services.posts.emit_posts().await;
        self.services.messages.emit_messages().await;

        self.shared
            .update(|state| state.form = MessageForm::default())
            .await;
        self.navigator.navigate(Route::Post(post_id));
        Ok(message)
    }

    pub fn go_back(&self) {
        self.navigator.back();
    }

    /// Releases every subscription and any pending user lookup.
    pub fn teardown(&mut self) {
        if !self.subscriptions.is_disposed() {
            log::debug!("releasing {} view subscriptions", self.subscriptions.len());
        }
        self.subscriptions.dispose();
    }

    pub fn is_torn_down(&self) -> bool {
        self.subscriptions.is_disposed()
    }

    async fn report(&self, err: anyhow::Error) -> ViewError {
        log::warn!("single post action failed, {:#}", err);
        let message = format!("{:#}", err);
        self.shared.update(|state| state.error = Some(message)).await;
        ViewError::Service(err)
    }
}
