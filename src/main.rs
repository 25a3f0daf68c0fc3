mod app;
mod middlewares;
mod routes;
mod services;
mod tracker;
mod types;
mod utils;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    app::{gen_app, gen_state, AppConfig},
    tracker::refresh::spawn_refresh_loop,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    info!("Starting tracker...");

    let config = AppConfig::from_env()?;
    let state = gen_state(&config);

    state.tracker.init_map().await;

    let shutdown = CancellationToken::new();
    let refresh = spawn_refresh_loop(
        state.tracker.clone(),
        config.refresh_interval,
        shutdown.clone(),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, gen_app(state))
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down");
                shutdown.cancel();
            }
        })
        .await?;

    shutdown.cancel();
    refresh.await?;

    Ok(())
}
