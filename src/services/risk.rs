use crate::error::PortfolioError;
use crate::models::AssetClass;
use crate::utils::round_decimal;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;

const EQUITY_LIMIT_PCT: Decimal = dec!(75);
const SECTOR_LIMIT_PCT: Decimal = dec!(50);

#[derive(Debug, Clone)]
pub struct RiskHolding {
    pub current_value: Decimal,
    pub asset_class: AssetClass,
    pub sector: &'static str,
}

/// Snapshot the risk endpoint analyses.
pub fn reference_portfolio() -> Vec<RiskHolding> {
    vec![
        // GOLD1
        RiskHolding {
            current_value: dec!(60842.70),
            asset_class: AssetClass::Commodity,
            sector: "Precious Metals",
        },
        // NATIONALUM
        RiskHolding {
            current_value: dec!(49938.35),
            asset_class: AssetClass::Equity,
            sector: "Mining",
        },
        // OIL
        RiskHolding {
            current_value: dec!(61925.13),
            asset_class: AssetClass::Equity,
            sector: "Oil",
        },
        // MOTILAL
        RiskHolding {
            current_value: dec!(61464.05),
            asset_class: AssetClass::Equity,
            sector: "Large and Mid Cap Fund",
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    High,
    Good,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub level: RiskLevel,
    pub severity: Severity,
    pub description: String,
    pub recommendation: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub total_risks: usize,
    pub high_risk_count: usize,
    pub overall_risk_score: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub total_portfolio_value: Decimal,
    pub asset_class_allocation: BTreeMap<String, Decimal>,
    pub sector_allocation: BTreeMap<String, Decimal>,
    pub risk_summary: RiskSummary,
    pub risks: Vec<RiskItem>,
}

/// Groups value by key, keeping first-seen order.
fn overflow(what: &str) -> PortfolioError {
    PortfolioError::CalculationFailed(format!("{} overflow in risk allocation", what))
}

/// Sums values per key, keeping first-seen order.
fn group_values<'a>(
    holdings: &'a [RiskHolding],
    key: impl Fn(&'a RiskHolding) -> String,
) -> Result<Vec<(String, Decimal)>, PortfolioError> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for holding in holdings {
        let name = key(holding);
        match groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, value)) => {
                *value = value
                    .checked_add(holding.current_value)
                    .ok_or_else(|| overflow("group total"))?;
            }
            None => groups.push((name, holding.current_value)),
        }
    }
    Ok(groups)
}

fn share(value: Decimal, total: Decimal) -> Result<Decimal, PortfolioError> {
    if total <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    value
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| overflow("share"))
}

fn shares(
    groups: Vec<(String, Decimal)>,
    total: Decimal,
) -> Result<Vec<(String, Decimal)>, PortfolioError> {
    groups
        .into_iter()
        .map(|(name, value)| Ok((name, share(value, total)?)))
        .collect()
}

pub fn assess(holdings: &[RiskHolding]) -> Result<RiskReport, PortfolioError> {
    let total = holdings.iter().try_fold(Decimal::ZERO, |acc, h| {
        acc.checked_add(h.current_value)
            .ok_or_else(|| overflow("portfolio total"))
    })?;

    let asset_classes = shares(group_values(holdings, |h| h.asset_class.to_string())?, total)?;
    let sectors = shares(group_values(holdings, |h| h.sector.to_string())?, total)?;

    let mut risks = Vec::with_capacity(3);

    let equity_pct = asset_classes
        .iter()
        .find(|(name, _)| name == AssetClass::Equity.as_str())
        .map(|(_, pct)| *pct)
        .unwrap_or(Decimal::ZERO);

    if equity_pct > EQUITY_LIMIT_PCT {
        risks.push(RiskItem {
            kind: "Asset Concentration",
            level: RiskLevel::High,
            severity: Severity::Warning,
            description: format!(
                "{:.1}% equity exposure exceeds recommended 75% limit",
                round_decimal(equity_pct, 1)
            ),
            recommendation: "Consider diversifying into bonds, commodities, or REITs to reduce equity concentration",
            icon: "⚠️",
        });
    } else {
        risks.push(RiskItem {
            kind: "Asset Allocation",
            level: RiskLevel::Good,
            severity: Severity::Info,
            description: format!(
                "Equity exposure at {:.1}% is within acceptable range",
                round_decimal(equity_pct, 1)
            ),
            recommendation: "Current asset allocation is well balanced",
            icon: "✅",
        });
    }

    // First-seen sector wins ties
    let (max_sector, max_sector_pct) = sectors
        .iter()
        .fold(None::<&(String, Decimal)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })
        .map(|(name, pct)| (name.as_str(), *pct))
        .unwrap_or(("Unknown", Decimal::ZERO));

    if max_sector_pct > SECTOR_LIMIT_PCT {
        risks.push(RiskItem {
            kind: "Sector Concentration",
            level: RiskLevel::High,
            severity: Severity::Warning,
            description: format!(
                "{:.1}% concentrated in {}",
                round_decimal(max_sector_pct, 1),
                max_sector
            ),
            recommendation: "Diversify across multiple sectors to reduce concentration risk",
            icon: "🚨",
        });
    } else {
        risks.push(RiskItem {
            kind: "Sector Diversification",
            level: RiskLevel::Good,
            severity: Severity::Success,
            description: format!(
                "Largest sector exposure: {} ({:.1}%)",
                max_sector,
                round_decimal(max_sector_pct, 1)
            ),
            recommendation: "Sector diversification is adequate",
            icon: "🎯",
        });
    }

    risks.push(RiskItem {
        kind: "Currency Risk",
        level: RiskLevel::Low,
        severity: Severity::Info,
        description: "All holdings in domestic currency (INR)".to_string(),
        recommendation: "Consider international exposure for currency diversification",
        icon: "💱",
    });

    let high_risk_count = risks.iter().filter(|r| r.level == RiskLevel::High).count();

    Ok(RiskReport {
        total_portfolio_value: total,
        asset_class_allocation: asset_classes
            .into_iter()
            .map(|(name, pct)| (name, round_decimal(pct, 2)))
            .collect(),
        sector_allocation: sectors
            .into_iter()
            .map(|(name, pct)| (name, round_decimal(pct, 2)))
            .collect(),
        risk_summary: RiskSummary {
            total_risks: risks.iter().filter(|r| r.severity == Severity::Warning).count(),
            high_risk_count,
            overall_risk_score: if high_risk_count > 0 { "Moderate" } else { "Low" },
        },
        risks,
    })
}
