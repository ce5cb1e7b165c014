use std::env;
use std::time::Duration;
use url::Url;

const DEFAULT_UPSTOX_BASE_URL: &str = "https://api.upstox.com/v2";
const DEFAULT_MF_API_BASE_URL: &str = "https://api.mfapi.in/mf";
const DEFAULT_HOLDINGS_PATH: &str = "data/portfolio_holdings.csv";

#[derive(Debug, Clone)]
pub struct UpstoxConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    pub base_url: String,
}

impl UpstoxConfig {
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some() && self.access_token.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub holdings_path: String,
    pub upstox: UpstoxConfig,
    pub mf_api_base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("Invalid PORT value"))?;

        let timeout_secs = env::var("PRICE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("Invalid PRICE_TIMEOUT_SECS value"))?;

        let upstox = UpstoxConfig {
            api_key: non_empty_var("UPSTOX_API_KEY"),
            api_secret: non_empty_var("UPSTOX_API_SECRET"),
            access_token: non_empty_var("UPSTOX_ACCESS_TOKEN"),
            base_url: base_url_var("UPSTOX_BASE_URL", DEFAULT_UPSTOX_BASE_URL)?,
        };

        if !upstox.has_credentials() {
            tracing::warn!(
                "Missing Upstox credentials; set UPSTOX_API_KEY, UPSTOX_API_SECRET and UPSTOX_ACCESS_TOKEN. Equity prices will fall back to file values."
            );
        }

        Ok(Config {
            port,
            holdings_path: env::var("HOLDINGS_PATH")
                .unwrap_or_else(|_| DEFAULT_HOLDINGS_PATH.to_string()),
            upstox,
            mf_api_base_url: base_url_var("MF_API_BASE_URL", DEFAULT_MF_API_BASE_URL)?,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|s| !s.is_empty())
}

/// Reads a base URL, validates it and strips any trailing slash.
fn base_url_var(key: &str, default: &str) -> anyhow::Result<String> {
    let raw = non_empty_var(key).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| anyhow::anyhow!("Invalid {} value {:?}: {}", key, raw, e))?;
    Ok(raw.trim_end_matches('/').to_string())
}
