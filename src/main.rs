use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use ping_gateway::sweeper::spawn_sweeper;
use ping_gateway::{AppState, Args, LimiterConfig, create_router, logging};

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    // parse cli arguments
    let args = Args::parse();
    let config = LimiterConfig::try_from(&args)?;

    // creating shared state
    let state = Arc::new(AppState::new(&config));

    // spawn the background sweeper
    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        Arc::clone(&state.registry),
        config.sweep_interval,
        config.idle_threshold,
        shutdown.clone(),
    );

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Gateway running on http://localhost:{}", args.port);
    tracing::info!(
        capacity = config.capacity,
        refill_rate = config.refill_rate,
        scope = ?config.scope,
        "Rate limit: burst of {} refilled at {}/s",
        config.capacity,
        config.refill_rate
    );
    tracing::info!(
        "Idle clients evicted after {:?}, swept every {:?}",
        config.idle_threshold,
        config.sweep_interval
    );

    // peer address must reach the admission middleware as ConnectInfo
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(wait_for_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    sweeper.await?;
    Ok(())
}

async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    shutdown.cancel();
}
