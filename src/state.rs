use crate::error::PortfolioError;
use crate::models::{Holding, PortfolioPl};
use crate::services::{pl, pricing::PriceResolver};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn PriceResolver>,
    /// Outcome of the startup load; the error text is reported per request.
    pub holdings: Arc<Result<Vec<Holding>, String>>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn PriceResolver>, holdings: Result<Vec<Holding>, String>) -> Self {
        Self {
            resolver,
            holdings: Arc::new(holdings),
        }
    }

    pub fn holdings(&self) -> Result<&[Holding], PortfolioError> {
        match self.holdings.as_ref() {
            Ok(holdings) => Ok(holdings),
            Err(e) => Err(PortfolioError::HoldingsUnavailable(e.clone())),
        }
    }

    pub async fn portfolio_pl(&self) -> Result<PortfolioPl, PortfolioError> {
        let holdings = self.holdings()?;
        pl::aggregate(self.resolver.as_ref(), holdings).await
    }
}
