use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// Asset class as written in the holdings file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Equity,
    Commodity,
    DebtFund,
    MutualFund,
    Other(String),
}

impl AssetClass {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().replace(['-', '_'], " ").as_str() {
            "equity" => AssetClass::Equity,
            "commodity" => AssetClass::Commodity,
            "debt fund" | "debt" => AssetClass::DebtFund,
            "mutual fund" | "mf" => AssetClass::MutualFund,
            _ => AssetClass::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetClass::Equity => "Equity",
            AssetClass::Commodity => "Commodity",
            AssetClass::DebtFund => "Debt Fund",
            AssetClass::MutualFund => "Mutual Fund",
            AssetClass::Other(name) => name,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AssetClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of the holdings file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub instrument: String,
    pub quantity: Decimal,
    pub avg_cost: Decimal,
    pub invested: Decimal,
    /// Valuation recorded in the file; used when no live price resolves.
    pub current_value: Decimal,
    pub asset_class: AssetClass,
    pub sector: String,
}

impl Holding {
    pub fn is_fund(&self) -> bool {
        let name = self.instrument.to_lowercase();
        name.contains("fund") || name.contains("mutual")
    }
}

/// Outcome of a single price lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceQuote {
    Price(Decimal),
    TokenExpired,
    Unavailable,
}

impl PriceQuote {
    /// The price, when it is usable for valuation.
    pub fn usable_price(&self) -> Option<Decimal> {
        match self {
            PriceQuote::Price(price) if *price > Decimal::ZERO => Some(*price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlLine {
    pub instrument: String,
    pub asset_class: AssetClass,
    pub invested: Decimal,
    pub current_value: Decimal,
    pub pl_amount: Decimal,
    pub pl_percentage: Decimal,
    pub current_price: Option<Decimal>,
    pub price_source: PriceSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioTotals {
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub total_pl: Decimal,
    pub total_pl_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioPl {
    #[serde(flatten)]
    pub totals: PortfolioTotals,
    pub details: Vec<PlLine>,
    pub timestamp: String,
}

/// Dashboard one-liner for the total P&L.
#[derive(Debug, Clone, Serialize)]
pub struct PlSummary {
    pub pl_text: String,
    pub pl_amount: Decimal,
    pub pl_percentage: Decimal,
    pub status: String,
}
