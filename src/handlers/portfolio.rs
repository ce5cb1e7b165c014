use crate::error::{ApiError, PortfolioError};
use crate::handlers::Success;
use crate::models::{PlLine, PortfolioPl};
use crate::services::{advanced_hedge, hedge, news, pl, risk, snapshot};
use crate::state::AppState;
use crate::utils::{format_currency, format_percentage, local_timestamp, round_decimal, sign_symbol};
use axum::{extract::State, Json};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PortfolioValue {
    pub invested: Decimal,
    pub current: Decimal,
    pub pl_amount: Decimal,
    pub pl_percentage: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FormattedPl {
    pub amount: String,
    pub percentage: String,
    pub sign: &'static str,
    pub display_text: String,
}

#[derive(Debug, Serialize)]
pub struct PlResponse {
    pub timestamp: String,
    pub portfolio_value: PortfolioValue,
    pub formatted_pl: FormattedPl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_stocks: Option<Vec<PlLine>>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn formatted(amount: Decimal, percentage: Decimal) -> FormattedPl {
    FormattedPl {
        amount: format_currency(amount, 2),
        percentage: format_percentage(percentage),
        sign: sign_symbol(amount),
        display_text: pl::display_text(amount, percentage),
    }
}

fn live_response(pl: PortfolioPl) -> PlResponse {
    let totals = &pl.totals;
    PlResponse {
        timestamp: pl.timestamp.clone(),
        portfolio_value: PortfolioValue {
            invested: totals.total_invested,
            current: totals.total_current_value,
            pl_amount: totals.total_pl,
            pl_percentage: round_decimal(totals.total_pl_percentage, 2),
        },
        formatted_pl: formatted(totals.total_pl, totals.total_pl_percentage),
        individual_stocks: Some(pl.details),
        status: "success",
        message: None,
    }
}

/// Hard-coded figures served when no live calculation is possible.
fn mock_response(error: &PortfolioError) -> PlResponse {
    let (status, message) = match error {
        PortfolioError::HoldingsUnavailable(_) => (
            "mock_data",
            format!("Using mock data - {}", error),
        ),
        PortfolioError::CalculationFailed(_) => ("error", error.to_string()),
    };

    PlResponse {
        timestamp: local_timestamp(),
        portfolio_value: PortfolioValue {
            invested: dec!(197860.35),
            current: dec!(234170.23),
            pl_amount: dec!(36309.88),
            pl_percentage: dec!(18.36),
        },
        formatted_pl: formatted(dec!(36309.88), dec!(18.36)),
        individual_stocks: None,
        status,
        message: Some(message),
    }
}

pub async fn get_portfolio_pl(State(state): State<AppState>) -> Json<PlResponse> {
    match state.portfolio_pl().await {
        Ok(pl) => Json(live_response(pl)),
        Err(e) => {
            tracing::error!("P&L calculation error: {}", e);
            Json(mock_response(&e))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RisksResponse {
    pub timestamp: String,
    #[serde(flatten)]
    pub report: risk::RiskReport,
}

pub async fn get_portfolio_risks() -> Result<Json<RisksResponse>, ApiError> {
    let report = risk::assess(&risk::reference_portfolio()).map_err(|e| {
        tracing::error!("Error getting portfolio risks: {}", e);
        ApiError::new("Unable to assess portfolio risks", e)
    })?;

    Ok(Json(RisksResponse {
        timestamp: local_timestamp(),
        report,
    }))
}

#[derive(Debug, Serialize)]
pub struct NewsBody {
    pub news: Vec<news::NewsItem>,
    pub total_articles: usize,
}

pub async fn get_portfolio_news(
    State(state): State<AppState>,
) -> Result<Json<Success<NewsBody>>, ApiError> {
    let holdings = state.holdings().map_err(|e| {
        tracing::error!("Error getting portfolio news: {}", e);
        ApiError::new("Unable to fetch portfolio news", e)
    })?;

    let items = news::top_news(holdings);
    Ok(Json(Success::new(
        NewsBody {
            total_articles: items.len(),
            news: items,
        },
        local_timestamp(),
    )))
}

#[derive(Debug, Serialize)]
pub struct SnapshotBody {
    pub snapshot: snapshot::PortfolioSnapshot,
}

pub async fn get_portfolio_snapshot(
    State(state): State<AppState>,
) -> Result<Json<Success<SnapshotBody>>, ApiError> {
    let snapshot = state
        .portfolio_pl()
        .await
        .and_then(|pl| snapshot::build(&pl))
        .map_err(|e| {
            tracing::error!("Error getting portfolio snapshot: {}", e);
            ApiError::new("Unable to fetch portfolio snapshot", e)
        })?;

    Ok(Json(Success::new(
        SnapshotBody { snapshot },
        local_timestamp(),
    )))
}

pub async fn get_hedge_analysis(
    State(state): State<AppState>,
) -> Json<Success<hedge::HedgeAnalysis>> {
    let pl = state.portfolio_pl().await;
    let now = chrono::Local::now();
    let analysis = hedge::analyze(&pl, now.date_naive());

    Json(Success::new(
        analysis,
        now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    ))
}

pub async fn get_advanced_hedge(
    State(state): State<AppState>,
) -> Json<Success<advanced_hedge::AdvancedHedgeAnalysis>> {
    let pl = state.portfolio_pl().await;
    Json(Success::new(
        advanced_hedge::analyze_with_portfolio_news(&pl),
        local_timestamp(),
    ))
}
