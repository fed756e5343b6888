use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pizzatron::config::Config;
use pizzatron::routes::create_routes;
use pizzatron::services::ai::AiGateway;
use pizzatron::services::blob::LocalBlobStore;
use pizzatron::services::jobs::Judge;
use pizzatron::services::openai::OpenAiProvider;
use pizzatron::services::prompts::Prompts;
use pizzatron::services::store::Store;
use pizzatron::services::worker;
use pizzatron::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pizzatron=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    // Refuse to start without the prompt templates
    let prompts = Arc::new(Prompts::load(&config.prompts_dir).context("loading prompts")?);
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set, portraits and reviews will fail");
    }

    let store = Store::connect(&config.database_url)
        .await
        .context("connecting to the database")?;
    let blobs = Arc::new(LocalBlobStore::new(&config.static_dir));
    let provider = Arc::new(OpenAiProvider::from_config(&config).context("building the AI client")?);
    let gateway = AiGateway::new(provider, blobs.clone(), store.clone(), prompts);
    let judge = Judge::new(store.clone(), blobs.clone(), gateway);

    let (tasks, worker) = worker::channel(config.worker_concurrency);
    let worker_handle = tokio::spawn(worker.run());

    let state = AppState {
        store,
        blobs,
        judge,
        tasks,
        leaderboard_limit: config.leaderboard_limit,
    };
    let app = create_routes(state, &config.static_dir, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last queue handle) is gone; let running tasks finish
    info!("Waiting for background tasks");
    worker_handle.await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
