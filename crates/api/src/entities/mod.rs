pub mod like;
pub mod token;

pub use like::LikeResult;
pub use token::Token;
