use portfolio_backend::{
    config::Config,
    models::{AssetClass, Holding, PriceQuote},
    services::pricing::{instrument_key, MarketDataClient, PriceResolver},
};
use rust_decimal::Decimal;

const EQUITY_SAMPLE: &str = "GOLD1";
const FUND_SAMPLE: &str = "Motilal Oswal Large and Midcap Fund";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    println!("🔍 Testing market data providers...");
    println!("  Upstox:  {}", config.upstox.base_url);
    println!(
        "  Token:   {}",
        config
            .upstox
            .access_token
            .as_deref()
            .map(redact_token)
            .unwrap_or_else(|| "<not set>".to_string())
    );
    println!("  MF API:  {}", redact_url(&config.mf_api_base_url));

    let client = MarketDataClient::from_config(&config)?;

    println!("\n📡 Checking {} ({})...", EQUITY_SAMPLE, instrument_key(EQUITY_SAMPLE));
    let equity = client
        .resolve(&sample_holding(EQUITY_SAMPLE, AssetClass::Equity))
        .await;
    report(equity);
    if equity == PriceQuote::TokenExpired {
        println!("\n💡 Suggestions:");
        println!("  1. Generate a fresh access token from the Upstox developer console");
        println!("  2. Update UPSTOX_ACCESS_TOKEN in .env");
    }

    println!("\n📡 Checking {}...", FUND_SAMPLE);
    let fund = client
        .resolve(&sample_holding(FUND_SAMPLE, AssetClass::MutualFund))
        .await;
    report(fund);

    if equity.usable_price().is_none() && fund.usable_price().is_none() {
        println!("\n❌ Both providers failed");
        return Err("no provider returned a usable price".into());
    }

    println!("\n✅ At least one provider is reachable. Try running: cargo run");
    Ok(())
}

fn sample_holding(instrument: &str, asset_class: AssetClass) -> Holding {
    Holding {
        instrument: instrument.to_string(),
        quantity: Decimal::ONE,
        avg_cost: Decimal::ZERO,
        invested: Decimal::ZERO,
        current_value: Decimal::ZERO,
        asset_class,
        sector: String::new(),
    }
}

fn report(quote: PriceQuote) {
    match quote {
        PriceQuote::Price(price) if price > Decimal::ZERO => {
            println!("✅ SUCCESS! Price {}", price)
        }
        PriceQuote::Price(price) => println!("⚠️ Provider answered with unusable price {}", price),
        PriceQuote::TokenExpired => println!("❌ Access token rejected (401)"),
        PriceQuote::Unavailable => println!("❌ No price available"),
    }
}

fn redact_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{}********", visible)
}

fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("********"));
            }
            parsed.set_query(None);
            parsed.to_string()
        }
        Err(_) => "<invalid URL>".to_string(),
    }
}
