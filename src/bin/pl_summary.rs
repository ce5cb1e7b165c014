use portfolio_backend::{
    config::Config,
    error::PortfolioError,
    services::{holdings, pl, pricing::MarketDataClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("portfolio_backend=warn")
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let client = MarketDataClient::from_config(&config)?;

    let result = match holdings::load_holdings(&config.holdings_path) {
        Ok(holdings) => pl::aggregate(&client, &holdings).await,
        Err(e) => Err(PortfolioError::HoldingsUnavailable(e.to_string())),
    };

    if let Err(e) = &result {
        tracing::error!("❌ {}", e);
    }

    println!("{}", serde_json::to_string_pretty(&pl::summarize(&result))?);
    Ok(())
}
