use fitcheck::{AppState, Config, FileSlot, RecordStore, advice::AdviceDesk, router};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let slot = FileSlot::new(&config.data_path);
    info!(path = %slot.path().display(), "using record slot");

    let store = RecordStore::hydrate(Arc::new(slot)).await;
    let coach = config.coach_provider();
    if coach.is_none() {
        info!("GEMINI_API_KEY not set; coach advice will use the fallback message");
    }
    let state = AppState::new(store, AdviceDesk::new(coach));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
