use crate::error::PortfolioError;
use crate::models::{AssetClass, PortfolioPl};
use crate::utils::round_decimal;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HoldingsSummary {
    pub total: usize,
    pub profitable: usize,
    pub loss_making: usize,
    pub profit_ratio: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationSlice {
    pub value: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetAllocation {
    pub equity: AllocationSlice,
    pub mutual_funds: AllocationSlice,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSnapshot {
    pub health_score: Decimal,
    pub health_status: &'static str,
    pub total_value: Decimal,
    pub total_invested: Decimal,
    pub total_pl: Decimal,
    pub total_pl_percentage: Decimal,
    pub holdings_summary: HoldingsSummary,
    pub asset_allocation: AssetAllocation,
    pub top_performer: Option<String>,
    pub worst_performer: Option<String>,
    pub last_updated: String,
}

/// 0-100: starts at 50, rewards return and the share of winners, extra penalty for losses.
pub fn health_score(pl_percentage: Decimal, profitable: usize, total: usize) -> Decimal {
    let winners = if total > 0 {
        Decimal::from(profitable) / Decimal::from(total) * dec!(30)
    } else {
        dec!(0)
    };
    let loss_penalty = if pl_percentage < dec!(0) {
        pl_percentage.abs().saturating_mul(dec!(0.5))
    } else {
        dec!(0)
    };

    // Saturating: the result is clamped anyway
    dec!(50)
        .saturating_add(pl_percentage.saturating_mul(dec!(2)))
        .saturating_add(winners)
        .saturating_sub(loss_penalty)
        .clamp(dec!(0), dec!(100))
}

pub fn health_status(score: Decimal) -> &'static str {
    if score >= dec!(80) {
        "excellent"
    } else if score >= dec!(60) {
        "good"
    } else if score >= dec!(40) {
        "fair"
    } else {
        "poor"
    }
}

fn overflow(what: &str) -> PortfolioError {
    PortfolioError::CalculationFailed(format!("{} overflow in snapshot", what))
}

fn slice(value: Decimal, total: Decimal) -> Result<AllocationSlice, PortfolioError> {
    let percentage = if total > dec!(0) {
        let pct = value
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| overflow("allocation"))?;
        round_decimal(pct, 1)
    } else {
        dec!(0)
    };
    Ok(AllocationSlice { value, percentage })
}

pub fn build(pl: &PortfolioPl) -> Result<PortfolioSnapshot, PortfolioError> {
    let totals = &pl.totals;
    let total = pl.details.len();
    let profitable = pl.details.iter().filter(|l| l.pl_amount > dec!(0)).count();

    let equity_value = pl
        .details
        .iter()
        .filter(|l| l.asset_class == AssetClass::Equity)
        .try_fold(dec!(0), |acc, l| {
            acc.checked_add(l.current_value)
                .ok_or_else(|| overflow("equity total"))
        })?;
    let other_value = totals
        .total_current_value
        .checked_sub(equity_value)
        .ok_or_else(|| overflow("non-equity total"))?;

    let score = health_score(totals.total_pl_percentage, profitable, total);

    // Earliest line wins ties in both directions
    let mut top: Option<(&str, Decimal)> = None;
    let mut worst: Option<(&str, Decimal)> = None;
    for line in &pl.details {
        let pct = line.pl_percentage;
        if top.map_or(true, |(_, best)| pct > best) {
            top = Some((line.instrument.as_str(), pct));
        }
        if worst.map_or(true, |(_, lowest)| pct < lowest) {
            worst = Some((line.instrument.as_str(), pct));
        }
    }

    Ok(PortfolioSnapshot {
        health_score: round_decimal(score, 1),
        health_status: health_status(score),
        total_value: totals.total_current_value,
        total_invested: totals.total_invested,
        total_pl: totals.total_pl,
        total_pl_percentage: totals.total_pl_percentage,
        holdings_summary: HoldingsSummary {
            total,
            profitable,
            loss_making: total - profitable,
            profit_ratio: if total > 0 {
                round_decimal(
                    Decimal::from(profitable) / Decimal::from(total) * dec!(100),
                    1,
                )
            } else {
                dec!(0)
            },
        },
        asset_allocation: AssetAllocation {
            equity: slice(equity_value, totals.total_current_value)?,
            mutual_funds: slice(other_value, totals.total_current_value)?,
        },
        top_performer: top.map(|(name, _)| name.to_string()),
        worst_performer: worst.map(|(name, _)| name.to_string()),
        last_updated: pl.timestamp.clone(),
    })
}
