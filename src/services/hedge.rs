use crate::error::PortfolioError;
use crate::models::{AssetClass, PlLine, PortfolioPl};
use crate::utils::{format_currency, round_decimal};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Portfolio value used when no aggregation is available.
pub const FALLBACK_PORTFOLIO_VALUE: Decimal = dec!(234170.23);

const SHOCK_5: Decimal = dec!(0.95);
const SHOCK_10: Decimal = dec!(0.90);
const HISTORY_MONTHS: i64 = 12;
const MONTHLY_GROWTH: Decimal = dec!(0.02);

#[derive(Debug, Clone, Serialize)]
pub struct CurrentPortfolio {
    pub value: Decimal,
    pub formatted_value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShockScenario {
    pub value: Decimal,
    pub impact: Decimal,
    pub formatted_impact: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShockScenarios {
    pub shock_5: ShockScenario,
    pub shock_10: ShockScenario,
}

/// One point of the illustrative history. Not market data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub month: String,
    pub date: String,
    pub normal_value: Decimal,
    pub shock_5_value: Decimal,
    pub shock_10_value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct HedgeAnalysis {
    pub current_portfolio: CurrentPortfolio,
    pub shock_scenarios: ShockScenarios,
    pub historical_data: Vec<HistoryPoint>,
    pub hedge_recommendations: Vec<String>,
}

/// Current value from an aggregation, or the fallback when it failed or is non-positive.
pub fn current_value(pl: &Result<PortfolioPl, PortfolioError>) -> Decimal {
    match pl {
        Ok(pl) if pl.totals.total_current_value > Decimal::ZERO => pl.totals.total_current_value,
        Ok(_) => {
            tracing::warn!("⚠️ Portfolio value is not positive, using fallback value");
            FALLBACK_PORTFOLIO_VALUE
        }
        Err(e) => {
            tracing::warn!("⚠️ P&L calculation failed ({}), using fallback value", e);
            FALLBACK_PORTFOLIO_VALUE
        }
    }
}

fn shock(current: Decimal, factor: Decimal) -> ShockScenario {
    let value = current * factor;
    let impact = value - current;
    ShockScenario {
        value: round_decimal(value, 2),
        impact: round_decimal(impact, 2),
        formatted_impact: format_currency(impact, 0),
    }
}

/// Maps a date string to a perturbation in [-0.05, 0.049].
fn date_jitter(date: &str) -> Decimal {
    let digest = Sha256::digest(date.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let bucket = (u64::from_be_bytes(prefix) % 100) as i64;
    Decimal::new(bucket - 50, 3)
}

/// Deterministic filler series: `current / (1 + 0.02 * k)` for k = 0..11, oldest
/// first, each scaled by a date-seeded wobble. Display only; not historical data.
pub fn filler_history(current: Decimal, today: NaiveDate) -> Vec<HistoryPoint> {
    (1..=HISTORY_MONTHS)
        .rev()
        .map(|months_back| {
            let date = today - Duration::days(months_back * 30);
            let date_text = date.format("%Y-%m-%d").to_string();
            let growth = dec!(1) + Decimal::from(HISTORY_MONTHS - months_back) * MONTHLY_GROWTH;
            let value = (current / growth).saturating_mul(dec!(1) + date_jitter(&date_text));

            HistoryPoint {
                month: date.format("%b %Y").to_string(),
                date: date_text,
                normal_value: round_decimal(value, 2),
                shock_5_value: round_decimal(value * SHOCK_5, 2),
                shock_10_value: round_decimal(value * SHOCK_10, 2),
            }
        })
        .collect()
}

pub fn recommendations(lines: Option<&[PlLine]>) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();
    let mut push = |rec: &str| {
        if !recs.iter().any(|existing| existing == rec) {
            recs.push(rec.to_string());
        }
    };

    if let Some(lines) = lines.filter(|lines| !lines.is_empty()) {
        if lines.iter().any(|l| l.asset_class == AssetClass::Equity) {
            push("Consider index puts (NIFTY) to hedge equity exposure");
            push("VIX calls can protect against market volatility");
        }
        for line in lines {
            let instrument = line.instrument.to_uppercase();
            if instrument.contains("GOLD") {
                push("Gold positions act as natural hedge - maintain allocation");
            } else if instrument.contains("OIL") || instrument.contains("ONGC") {
                push("Energy sector hedging via commodity futures");
            }
        }
    }

    if recs.is_empty() {
        recs = [
            "Consider NIFTY put options for downside protection",
            "Increase allocation to defensive sectors like FMCG",
            "Maintain cash reserves for market opportunities",
            "Use VIX futures to hedge against volatility",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
    }
    recs
}

pub fn analyze(pl: &Result<PortfolioPl, PortfolioError>, today: NaiveDate) -> HedgeAnalysis {
    let current = current_value(pl);
    let lines = pl.as_ref().ok().map(|pl| pl.details.as_slice());

    HedgeAnalysis {
        current_portfolio: CurrentPortfolio {
            value: round_decimal(current, 2),
            formatted_value: format_currency(current, 2),
        },
        shock_scenarios: ShockScenarios {
            shock_5: shock(current, SHOCK_5),
            shock_10: shock(current, SHOCK_10),
        },
        historical_data: filler_history(current, today),
        hedge_recommendations: recommendations(lines),
    }
}
