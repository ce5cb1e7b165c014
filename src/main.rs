use std::sync::Arc;

use portfolio_backend::{
    app,
    config::Config,
    services::{holdings, pricing::MarketDataClient},
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portfolio_backend=debug,tower_http=debug")),
        )
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Holdings are read once; a failure is served as mock data later
    let holdings = holdings::load_holdings(&config.holdings_path).map_err(|e| {
        tracing::error!("❌ Could not load holdings from {}: {}", config.holdings_path, e);
        e.to_string()
    });

    let resolver = MarketDataClient::from_config(&config)?;
    let state = AppState::new(Arc::new(resolver), holdings);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🚀 Portfolio backend running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
