#![forbid(unsafe_code)]

pub mod auth_middleware;
pub mod common;
pub mod entities;
pub mod error;
pub mod navigator;
pub mod routers;

#[cfg(test)]
mod testing;

use lazy_static::lazy_static;
use tera::Tera;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let glob = std::env::var("POSTROOM_TEMPLATES")
            .unwrap_or_else(|_| String::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/*")));
        match Tera::new(&glob) {
            Ok(template) => template,
            Err(err) => {
                log::error!("Parsing error(s): {}", err);
                ::std::process::exit(1);
            }
        }
    };
}
