use crate::services::sentiment::{self, SentimentSummary, StockSentiment, PORTFOLIO_NEWS};
use crate::utils::local_timestamp;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub primary_method: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub timestamp: String,
    pub model_info: ModelInfo,
    pub portfolio_summary: SentimentSummary,
    pub stock_sentiments: Vec<StockSentiment>,
}

pub async fn get_portfolio_sentiment() -> Json<SentimentResponse> {
    let report = sentiment::portfolio_report(PORTFOLIO_NEWS);
    tracing::debug!(
        "📰 Scored {} headlines, overall {:?}",
        report.stock_sentiments.len(),
        report.portfolio_summary.overall_sentiment
    );

    Json(SentimentResponse {
        timestamp: local_timestamp(),
        model_info: ModelInfo {
            primary_method: sentiment::METHOD,
        },
        portfolio_summary: report.portfolio_summary,
        stock_sentiments: report.stock_sentiments,
    })
}
