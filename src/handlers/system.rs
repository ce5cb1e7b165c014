use crate::utils::local_timestamp;
use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "Portfolio Analytics API";

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: local_timestamp(),
    })
}

#[derive(Debug, Serialize)]
pub struct ServiceIndex {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
    pub integrations: &'static [&'static str],
}

pub const ENDPOINTS: &[&str] = &[
    "/api/sentiment",
    "/api/portfolio/risks",
    "/api/portfolio/pl",
    "/api/portfolio/top-news",
    "/api/portfolio/snapshot",
    "/api/portfolio/hedge-analysis",
    "/api/portfolio/advanced-hedge",
    "/health",
];

pub async fn index() -> Json<ServiceIndex> {
    Json(ServiceIndex {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
        integrations: &[
            "Upstox market quotes (equity LTP)",
            "MFAPI (mutual fund NAV)",
            "Lexicon sentiment scoring",
        ],
    })
}
