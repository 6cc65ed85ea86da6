#![forbid(unsafe_code)]

pub mod error;
pub mod form;
pub mod identity;
pub mod navigation;
pub mod services;
pub mod single_post;
pub mod subscriptions;

pub use error::ViewError;
pub use identity::Identity;
pub use services::Services;
pub use single_post::{LikeOutcome, PostPage, SinglePostView};
