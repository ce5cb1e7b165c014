use crate::error::PortfolioError;
use crate::models::{
    Holding, PlLine, PlSummary, PortfolioPl, PortfolioTotals, PriceQuote, PriceSource,
};
use crate::services::pricing::PriceResolver;
use crate::utils::{format_currency, format_percentage, sign_symbol};
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn overflow(what: &str) -> PortfolioError {
    PortfolioError::CalculationFailed(format!("{} overflow", what))
}

/// P&L percentage with the zero-invested guard.
pub fn pl_percentage(pl_amount: Decimal, invested: Decimal) -> Result<Decimal, PortfolioError> {
    if invested <= dec!(0) {
        return Ok(dec!(0));
    }
    pl_amount
        .checked_div(invested)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| overflow("P&L percentage"))
}

/// Values one holding, falling back to the file valuation when the quote is unusable.
pub fn value_holding(holding: &Holding, quote: PriceQuote) -> Result<PlLine, PortfolioError> {
    let (current_value, current_price, price_source) = match quote.usable_price() {
        Some(price) => {
            let value = holding.quantity.checked_mul(price).ok_or_else(|| {
                PortfolioError::CalculationFailed(format!(
                    "valuation overflow for {}",
                    holding.instrument
                ))
            })?;
            (value, Some(price), PriceSource::Live)
        }
        None => {
            tracing::warn!(
                "⚠️ Using file valuation for {} ({:?})",
                holding.instrument,
                quote
            );
            (holding.current_value, None, PriceSource::Fallback)
        }
    };

    let pl_amount = current_value
        .checked_sub(holding.invested)
        .ok_or_else(|| overflow(&format!("P&L for {}", holding.instrument)))?;

    Ok(PlLine {
        instrument: holding.instrument.clone(),
        asset_class: holding.asset_class.clone(),
        invested: holding.invested,
        current_value,
        pl_amount,
        pl_percentage: pl_percentage(pl_amount, holding.invested)?,
        current_price,
        price_source,
    })
}

pub fn totals(lines: &[PlLine]) -> Result<PortfolioTotals, PortfolioError> {
    let mut total_invested = dec!(0);
    let mut total_current_value = dec!(0);

    for line in lines {
        total_invested = total_invested
            .checked_add(line.invested)
            .ok_or_else(|| overflow("invested total"))?;
        total_current_value = total_current_value
            .checked_add(line.current_value)
            .ok_or_else(|| overflow("current total"))?;
    }

    let total_pl = total_current_value
        .checked_sub(total_invested)
        .ok_or_else(|| overflow("total P&L"))?;

    Ok(PortfolioTotals {
        total_invested,
        total_current_value,
        total_pl,
        total_pl_percentage: pl_percentage(total_pl, total_invested)?,
    })
}

/// Prices every holding and sums the lines. Resolution failures degrade single
/// lines to file values; only arithmetic failure aborts.
pub async fn aggregate(
    resolver: &dyn PriceResolver,
    holdings: &[Holding],
) -> Result<PortfolioPl, PortfolioError> {
    let quotes = join_all(holdings.iter().map(|holding| resolver.resolve(holding))).await;

    let details = holdings
        .iter()
        .zip(quotes)
        .map(|(holding, quote)| value_holding(holding, quote))
        .collect::<Result<Vec<_>, _>>()?;

    let totals = totals(&details)?;
    let live = details
        .iter()
        .filter(|line| line.price_source == PriceSource::Live)
        .count();
    tracing::info!(
        "📊 Portfolio P&L: {} live / {} fallback, total {}",
        live,
        details.len() - live,
        totals.total_pl
    );

    Ok(PortfolioPl {
        totals,
        details,
        timestamp: chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
    })
}

/// Dashboard text, e.g. `+₹36,309.88 (+18.35% today)`.
pub fn display_text(amount: Decimal, percentage: Decimal) -> String {
    format!(
        "{}{} ({} today)",
        sign_symbol(amount),
        format_currency(amount, 2),
        format_percentage(percentage)
    )
}

pub fn summarize(result: &Result<PortfolioPl, PortfolioError>) -> PlSummary {
    match result {
        Ok(pl) => {
            let amount = pl.totals.total_pl;
            let percentage = pl.totals.total_pl_percentage;
            PlSummary {
                pl_text: display_text(amount, percentage),
                pl_amount: amount,
                pl_percentage: percentage,
                status: "success".to_string(),
            }
        }
        Err(e) => {
            tracing::error!("P&L summary unavailable: {}", e);
            PlSummary {
                pl_text: "P&L calculation unavailable".to_string(),
                pl_amount: dec!(0),
                pl_percentage: dec!(0),
                status: "error".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetClass;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixedQuotes(HashMap<&'static str, PriceQuote>);

    #[async_trait]
    impl PriceResolver for FixedQuotes {
        async fn resolve(&self, holding: &Holding) -> PriceQuote {
            self.0
                .get(holding.instrument.as_str())
                .copied()
                .unwrap_or(PriceQuote::Unavailable)
        }
    }

    fn holding(name: &str, quantity: Decimal, invested: Decimal, current: Decimal) -> Holding {
        Holding {
            instrument: name.to_string(),
            quantity,
            avg_cost: dec!(0),
            invested,
            current_value: current,
            asset_class: AssetClass::Equity,
            sector: "Test".to_string(),
        }
    }

    #[test]
    fn zero_invested_has_zero_percentage() {
        let line = value_holding(
            &holding("FREE", dec!(5), dec!(0), dec!(50)),
            PriceQuote::Price(dec!(12)),
        )
        .unwrap();

        assert_eq!(line.current_value, dec!(60));
        assert_eq!(line.pl_percentage, dec!(0));
    }

    #[test]
    fn live_price_values_quantity_times_quote() {
        let line = value_holding(
            &holding("OIL", dec!(80), dec!(19988.95), dec!(20800.80)),
            PriceQuote::Price(dec!(261.37)),
        )
        .unwrap();

        assert_eq!(line.current_value, dec!(80) * dec!(261.37));
        assert_eq!(line.current_price, Some(dec!(261.37)));
        assert_eq!(line.price_source, PriceSource::Live);
    }

    #[test]
    fn unavailable_quote_uses_file_value() {
        let line = value_holding(
            &holding("X", dec!(10), dec!(1000), dec!(1100)),
            PriceQuote::Unavailable,
        )
        .unwrap();

        assert_eq!(line.price_source, PriceSource::Fallback);
        assert_eq!(line.pl_amount, dec!(100));
        assert_eq!(line.pl_percentage, dec!(10));
        assert_eq!(line.current_price, None);
    }

    #[test]
    fn token_expired_and_non_positive_fall_back_like_unavailable() {
        let h = holding("X", dec!(10), dec!(1000), dec!(1100));
        let unavailable = value_holding(&h, PriceQuote::Unavailable).unwrap();

        for quote in [
            PriceQuote::TokenExpired,
            PriceQuote::Price(dec!(0)),
            PriceQuote::Price(dec!(-3)),
        ] {
            assert_eq!(value_holding(&h, quote).unwrap(), unavailable);
        }
    }

    #[test]
    fn overflow_is_a_calculation_failure() {
        let result = value_holding(
            &holding("BIG", Decimal::MAX, dec!(1), dec!(1)),
            PriceQuote::Price(dec!(2)),
        );
        assert!(matches!(result, Err(PortfolioError::CalculationFailed(_))));
    }

    #[test]
    fn percentage_overflow_is_a_calculation_failure() {
        // Tiny invested amount against a huge file valuation
        let data = "Instrument,Qty.,Avg. cost,Invested,Cur. val,Asset Class,Sector\n\
                    X,1,1,0.01,1000000000000000000000000000,Commodity,Test\n";
        let holdings = crate::services::holdings::read_holdings(data.as_bytes()).unwrap();
        let result = value_holding(&holdings[0], PriceQuote::Unavailable);
        assert!(matches!(result, Err(PortfolioError::CalculationFailed(_))));

        let live = value_holding(
            &holding("LIVE", Decimal::from_scientific("1e24").unwrap(), dec!(1), dec!(1)),
            PriceQuote::Price(dec!(1000)),
        );
        assert!(matches!(live, Err(PortfolioError::CalculationFailed(_))));
    }

    #[test]
    fn negative_file_values_cannot_overflow_the_difference() {
        let result = value_holding(
            &holding("NEG", dec!(1), Decimal::MAX, Decimal::MIN),
            PriceQuote::Unavailable,
        );
        assert!(matches!(result, Err(PortfolioError::CalculationFailed(_))));
    }

    #[test]
    fn overflowing_percentage_aborts_totals() {
        let line = PlLine {
            instrument: "X".to_string(),
            asset_class: AssetClass::Commodity,
            invested: dec!(0.01),
            current_value: Decimal::MAX,
            pl_amount: Decimal::MAX,
            pl_percentage: dec!(0),
            current_price: None,
            price_source: PriceSource::Fallback,
        };
        assert!(matches!(
            totals(&[line]),
            Err(PortfolioError::CalculationFailed(_))
        ));
    }

    #[test]
    fn percentage_is_zero_without_investment() {
        assert_eq!(pl_percentage(dec!(50), dec!(0)).unwrap(), dec!(0));
        assert_eq!(pl_percentage(dec!(100), dec!(1000)).unwrap(), dec!(10));
    }

    #[tokio::test]
    async fn total_pl_equals_sum_of_lines_with_mixed_sources() {
        let holdings = vec![
            holding("GOLD1", dec!(700), dec!(48062.14), dec!(60842.70)),
            holding("NATIONALUM", dec!(110), dec!(19414.65), dec!(24116.42)),
            holding("OIL", dec!(80), dec!(19988.95), dec!(20800.80)),
            holding("EMPTY", dec!(0), dec!(0), dec!(0)),
        ];
        let resolver = FixedQuotes(HashMap::from([
            ("GOLD1", PriceQuote::Price(dec!(91.25))),
            ("NATIONALUM", PriceQuote::TokenExpired),
        ]));

        let pl = aggregate(&resolver, &holdings).await.unwrap();

        let line_sum: Decimal = pl.details.iter().map(|l| l.pl_amount).sum();
        assert_eq!(pl.totals.total_pl, line_sum);
        assert_eq!(
            pl.details.iter().map(|l| l.instrument.as_str()).collect::<Vec<_>>(),
            ["GOLD1", "NATIONALUM", "OIL", "EMPTY"]
        );
        assert_eq!(pl.details[0].price_source, PriceSource::Live);
        assert_eq!(pl.details[1].price_source, PriceSource::Fallback);
        assert_eq!(
            pl.totals.total_invested,
            dec!(48062.14) + dec!(19414.65) + dec!(19988.95)
        );
    }

    #[tokio::test]
    async fn empty_portfolio_has_zero_percentage() {
        let pl = aggregate(&FixedQuotes(HashMap::new()), &[]).await.unwrap();
        assert_eq!(pl.totals.total_invested, dec!(0));
        assert_eq!(pl.totals.total_pl_percentage, dec!(0));
    }

    #[test]
    fn summary_text_matches_dashboard_format() {
        let lines = vec![
            value_holding(
                &holding("A", dec!(1), dec!(197860.35), dec!(234170.23)),
                PriceQuote::Unavailable,
            )
            .unwrap(),
        ];
        let pl = PortfolioPl {
            totals: totals(&lines).unwrap(),
            details: lines,
            timestamp: String::new(),
        };

        let summary = summarize(&Ok(pl));

        assert_eq!(summary.status, "success");
        assert_eq!(summary.pl_text, "+₹36,309.88 (+18.35% today)");
    }

    #[test]
    fn losses_keep_their_sign() {
        assert_eq!(display_text(dec!(-1250.5), dec!(-4.2)), "-₹1,250.50 (-4.20% today)");
    }

    #[test]
    fn summary_of_failure_is_labelled_error() {
        let summary = summarize(&Err(PortfolioError::HoldingsUnavailable("gone".into())));
        assert_eq!(summary.status, "error");
        assert_eq!(summary.pl_amount, dec!(0));
    }
}
