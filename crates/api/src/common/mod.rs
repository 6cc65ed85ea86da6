pub mod users;
pub mod views;
