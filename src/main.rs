use daily_affirmations::api::{self, app_state::AppState};
use daily_affirmations::config::loader::ConfigLoader;
use daily_affirmations::observability::{
    AppMetrics, ObservabilityState, create_observability_router, init_tracing,
};
use daily_affirmations::services::{AffirmationSession, GeminiModel, GenerationClient};
use daily_affirmations::storage::JsonFileHistoryStore;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    let _log_guard = init_tracing(&config.app_name, &config.logging);

    info!("Starting Daily Affirmations...");
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let store = Arc::new(JsonFileHistoryStore::new(&config.storage.history_file));
    info!("History store at {}", config.storage.history_file.display());

    let model = Arc::new(GeminiModel::from_config(&config.generation));
    let client = GenerationClient::new(model);
    info!("Generation client initialized: {}", client.model_name());

    let session = AffirmationSession::open(store, client).await;

    let metrics = Arc::new(AppMetrics::default());
    let app_state = AppState::with_system_clock(session, metrics.clone())?;
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
        &config.generation.model,
        config.storage.history_file.display().to_string(),
    ));
    let router = create_observability_router(observability_state).merge(api::create_router(app_state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
