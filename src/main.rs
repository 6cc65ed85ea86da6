#![forbid(unsafe_code)]

mod config;
mod router;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use db::{seed::Seed, Database};
use dotenvy::dotenv;
use listenfd::ListenFd;
use web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut listenfd = ListenFd::from_env();

    let tcp_socket: Option<std::net::TcpListener> = match listenfd.take_tcp_listener(0) {
        Ok(socket) => socket,
        Err(_) => None,
    };

    let config = config::process_config()?;
    if config.storage.path.is_none() {
        log::warn!("no storage path configured, nothing will be persisted");
    }
    let db = Database::open(&config.storage.database_url()).await?;
    if let Some(seed) = &config.storage.seed {
        if db.is_empty().await? {
            db.import(&Seed::from_file(seed).await?).await?;
            log::info!("imported seed {}", seed.display());
        }
    }
    let db = Arc::new(db);

    let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port)
        .parse()
        .context("invalid web.host or web.port")?;
    let state = Arc::new(AppState::new(db, config));
    let app = router::app(state);

    match tcp_socket {
        // cargo-watch thing
        Some(listener) => {
            axum::Server::from_tcp(listener)?
                .serve(app.into_make_service())
                .await?
        }
        None => {
            log::info!("listening on {}", addr);
            axum::Server::bind(&addr)
                .serve(app.into_make_service())
                .await?
        }
    };

    Ok(())
}
