#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod state;

pub use state::AppState;
