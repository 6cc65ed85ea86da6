#![forbid(unsafe_code)]

pub mod database;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod seed;
pub mod services;
pub mod subject;
pub mod types;
pub mod utils;

pub use database::Database;
