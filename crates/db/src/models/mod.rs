pub mod like;
pub mod message;
pub mod post;
pub mod session;
pub mod user;

pub use like::Like;
pub use message::{Message, NewMessage};
pub use post::{NewPost, Post};
pub use session::Session;
pub use user::User;
