use crate::config::Config;
use crate::models::{AssetClass, Holding, PriceQuote};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Portfolio symbol -> Upstox instrument key.
const SYMBOL_MAP: &[(&str, &str)] = &[
    ("GOLD1", "NSE_EQ|INE970I01023"),      // GOLDBEES
    ("NATIONALUM", "NSE_EQ|INE139A01034"), // National Aluminium
    ("OIL", "NSE_EQ|INE213A01029"),        // ONGC
];

const DEFAULT_EXCHANGE_PREFIX: &str = "NSE_EQ|";

pub fn instrument_key(symbol: &str) -> String {
    SYMBOL_MAP
        .iter()
        .find(|(portfolio_symbol, _)| *portfolio_symbol == symbol)
        .map(|(_, key)| key.to_string())
        .unwrap_or_else(|| format!("{}{}", DEFAULT_EXCHANGE_PREFIX, symbol))
}

#[async_trait]
pub trait PriceResolver: Send + Sync {
    async fn resolve(&self, holding: &Holding) -> PriceQuote;
}

#[derive(Debug, Deserialize)]
struct LtpResponse {
    status: Option<String>,
    data: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct SchemeSearchResult {
    #[serde(rename = "schemeCode")]
    scheme_code: Value,
}

#[derive(Debug, Deserialize)]
struct NavResponse {
    meta: NavMeta,
    data: Vec<NavEntry>,
}

#[derive(Debug, Deserialize)]
struct NavMeta {
    fund_house: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NavEntry {
    nav: Value,
}

/// Live quotes from Upstox (equities) and MF API (mutual fund NAVs).
pub struct MarketDataClient {
    http_client: Client,
    upstox_base_url: String,
    access_token: Option<String>,
    mf_api_base_url: String,
}

impl MarketDataClient {
    pub fn new(
        upstox_base_url: impl Into<String>,
        access_token: Option<String>,
        mf_api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            upstox_base_url: upstox_base_url.into(),
            access_token,
            mf_api_base_url: mf_api_base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.upstox.base_url.clone(),
            config.upstox.access_token.clone(),
            config.mf_api_base_url.clone(),
            config.request_timeout,
        )
    }

    pub async fn equity_price(&self, symbol: &str) -> PriceQuote {
        let Some(token) = self.access_token.as_deref() else {
            warn!("⚠️ No Upstox access token configured; skipping live price for {}", symbol);
            return PriceQuote::Unavailable;
        };

        let key = instrument_key(symbol);
        let url = format!("{}/market-quote/ltp", self.upstox_base_url);
        debug!("Fetching price for {} (Upstox: {}) from {}", symbol, key, url);

        let response = match self
            .http_client
            .get(&url)
            .query(&[("instrument_key", key.as_str())])
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("❌ Upstox request failed for {}: {}", symbol, e);
                return PriceQuote::Unavailable;
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("🔑 Upstox access token expired (401) while pricing {}", symbol);
            return PriceQuote::TokenExpired;
        }
        if status != reqwest::StatusCode::OK {
            warn!("❌ Upstox returned {} for {}", status, symbol);
            return PriceQuote::Unavailable;
        }

        let payload: LtpResponse = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("❌ Malformed Upstox payload for {}: {}", symbol, e);
                return PriceQuote::Unavailable;
            }
        };

        match last_traded_price(&payload) {
            Some(price) => {
                info!("✅ Got price for {}: ₹{}", symbol, price);
                PriceQuote::Price(price)
            }
            None => {
                warn!("❌ Upstox payload for {} carried no last_price", symbol);
                PriceQuote::Unavailable
            }
        }
    }

    pub async fn fund_nav(&self, scheme_name: &str) -> PriceQuote {
        match self.fetch_nav(scheme_name).await {
            Ok(Some(nav)) => {
                info!("✅ Got NAV for {}: ₹{}", scheme_name, nav);
                PriceQuote::Price(nav)
            }
            Ok(None) => {
                warn!("❌ MF API had no usable NAV for {}", scheme_name);
                PriceQuote::Unavailable
            }
            Err(e) => {
                warn!("❌ MF API failed for {}: {}", scheme_name, e);
                PriceQuote::Unavailable
            }
        }
    }

    async fn fetch_nav(&self, scheme_name: &str) -> anyhow::Result<Option<Decimal>> {
        let search_url = format!("{}/search", self.mf_api_base_url);
        let response = self
            .http_client
            .get(&search_url)
            .query(&[("q", scheme_name)])
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(anyhow::anyhow!("scheme search returned {}", response.status()));
        }

        let results: Vec<SchemeSearchResult> = response.json().await?;
        // First match wins
        let Some(first) = results.first() else {
            return Ok(None);
        };
        let scheme_code = match &first.scheme_code {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => return Err(anyhow::anyhow!("unexpected schemeCode {}", other)),
        };

        let nav_url = format!("{}/{}", self.mf_api_base_url, scheme_code);
        let response = self.http_client.get(&nav_url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(anyhow::anyhow!(
                "NAV lookup for scheme {} returned {}",
                scheme_code,
                response.status()
            ));
        }

        let nav: NavResponse = response.json().await?;
        if nav.meta.fund_house.as_deref().map_or(true, str::is_empty) {
            return Ok(None);
        }

        // Index 0 is the most recent entry
        Ok(nav.data.first().and_then(|entry| json_decimal(&entry.nav)))
    }
}

#[async_trait]
impl PriceResolver for MarketDataClient {
    async fn resolve(&self, holding: &Holding) -> PriceQuote {
        if holding.asset_class == AssetClass::Equity {
            self.equity_price(&holding.instrument).await
        } else if holding.is_fund() {
            self.fund_nav(&holding.instrument).await
        } else {
            debug!(
                "No price source for {} ({})",
                holding.instrument, holding.asset_class
            );
            PriceQuote::Unavailable
        }
    }
}

/// The response key need not echo the requested instrument key, so the first
/// entry exposing `last_price` is taken.
fn last_traded_price(payload: &LtpResponse) -> Option<Decimal> {
    if payload.status.as_deref() != Some("success") {
        return None;
    }
    payload
        .data
        .as_ref()?
        .values()
        .find_map(|entry| entry.get("last_price").and_then(json_decimal))
}

fn json_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
