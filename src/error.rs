use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HoldingsError {
    #[error("failed to open holdings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed holdings file: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: invalid {field} value {value:?}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Error)]
pub enum PortfolioError {
    #[error("holdings unavailable: {0}")]
    HoldingsUnavailable(String),

    #[error("P&L calculation failed: {0}")]
    CalculationFailed(String),
}

/// Error body returned with HTTP 500.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: &'static str,
    pub message: String,
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            status: "error",
            message: message.into(),
            error: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
