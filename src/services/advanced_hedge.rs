//! Eight-step hedge walkthrough.
//!
//! Only step 1 (concentration), step 3 (headline sentiment) and the values derived
//! from them vary; the news, quant and backtest figures are fixed illustrations.
//! Sentiment is composed in-process from [`sentiment::portfolio_report`].

use crate::error::PortfolioError;
use crate::models::PortfolioPl;
use crate::services::hedge::FALLBACK_PORTFOLIO_VALUE;
use crate::services::sentiment::{self, SentimentLabel, SentimentReport};
use crate::utils::round_f64;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

const RISK_REDUCTION_PCT: f64 = 23.4;
const BASELINE_RETURN: f64 = 0.124;
const VOLATILITY_FORECAST: f64 = 0.184;
const MARKET_CORRELATION: f64 = 0.75;
const MATERIALS_EXPOSURE: f64 = 45.2;

/// Valuation used when live aggregation is not available.
fn fallback_positions() -> Vec<(String, Decimal)> {
    [
        ("GOLD1", dec!(60842.70)),
        ("NATIONALUM", dec!(24116.42)),
        ("OIL", dec!(20800.80)),
        ("Motilal MF", dec!(128410.31)),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Concentration {
    pub top_holding_weight: f64,
    pub herfindahl_index: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectorExposure {
    pub materials: f64,
    pub energy: f64,
    pub mutual_funds: f64,
}

impl SectorExposure {
    fn max(&self) -> f64 {
        self.materials.max(self.energy).max(self.mutual_funds)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioAnalysis {
    pub total_value: Decimal,
    pub num_holdings: usize,
    pub concentration: Concentration,
    pub sector_exposure: SectorExposure,
}

#[derive(Debug, Clone, Serialize)]
pub struct Theme {
    pub theme: &'static str,
    pub sentiment: f64,
    pub relevance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsAnalysis {
    pub sources_processed: u32,
    pub articles_analyzed: u32,
    pub relevant_articles: u32,
    pub key_themes: Vec<Theme>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockSignal {
    pub symbol: String,
    pub sentiment: &'static str,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentStep {
    pub overall_sentiment: &'static str,
    pub confidence: f64,
    pub stock_sentiments: Vec<StockSignal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalFeatures {
    pub sentiment_score: f64,
    pub sentiment_momentum: f64,
    pub volume_anomaly: f64,
    pub news_impact: f64,
    pub mention_count: u32,
    pub surprise_factor: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub market_correlation: f64,
    pub intra_portfolio_correlation: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantAnalysis {
    pub baseline_expected_return: f64,
    pub sentiment_adjusted_return: f64,
    pub volatility_forecast: f64,
    pub beta_estimate: f64,
    pub correlation_matrix: CorrelationMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskFactors {
    pub concentration_risk: bool,
    pub sector_concentration: bool,
    pub volatility_risk: bool,
    pub correlation_risk: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HedgeAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize)]
pub struct HedgeInstruction {
    pub instrument: &'static str,
    pub action: HedgeAction,
    pub allocation_pct: f64,
    pub cost_pct: f64,
    pub rationale: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationStep {
    pub risk_factors: RiskFactors,
    pub hedge_recommendations: Vec<HedgeInstruction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Explanations {
    pub primary_risk: String,
    pub secondary_risk: String,
    pub hedge_logic: &'static str,
    pub cost_benefit: String,
    pub sentiment_impact: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyPerformance {
    pub win_rate: f64,
    pub avg_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_reduction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionCosts {
    pub avg_cost_per_trade: f64,
    pub annual_hedge_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub hedge_drag: f64,
    pub protection: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioAnalysis {
    pub bull_market: ScenarioOutcome,
    pub bear_market: ScenarioOutcome,
    pub sideways: ScenarioOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResults {
    pub test_period: &'static str,
    pub strategy_performance: StrategyPerformance,
    pub transaction_costs: TransactionCosts,
    pub scenario_analysis: ScenarioAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSteps {
    pub step_1_portfolio: PortfolioAnalysis,
    pub step_2_text_ingestion: NewsAnalysis,
    #[serde(rename = "step_3_finbert_sentiment")]
    pub step_3_sentiment: SentimentStep,
    pub step_4_signal_engineering: SignalFeatures,
    pub step_5_quant_signals: QuantAnalysis,
    pub step_6_optimization: OptimizationStep,
    pub step_7_explainability: Explanations,
    pub step_8_backtesting: BacktestResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancedHedgeSummary {
    pub total_portfolio_value: Decimal,
    pub risk_reduction_pct: f64,
    pub expected_hedge_cost_pct: f64,
    pub recommended_actions: usize,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancedHedgeAnalysis {
    pub analysis_steps: AnalysisSteps,
    pub summary: AdvancedHedgeSummary,
}

fn market_view(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "Bullish",
        SentimentLabel::Negative => "Bearish",
        SentimentLabel::Neutral => "Neutral",
    }
}

fn label_title(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "Positive",
        SentimentLabel::Negative => "Negative",
        SentimentLabel::Neutral => "Neutral",
    }
}

fn concentration(positions: &[(String, Decimal)], total: Decimal) -> Concentration {
    if total <= Decimal::ZERO {
        return Concentration {
            top_holding_weight: 0.0,
            herfindahl_index: 0.0,
        };
    }
    // Weights in f64; decimal division can overflow for tiny totals
    let total = total.to_f64().unwrap_or(f64::INFINITY);
    let weights: Vec<f64> = positions
        .iter()
        .map(|(_, value)| value.to_f64().unwrap_or(0.0) / total)
        .collect();

    Concentration {
        top_holding_weight: round_f64(weights.iter().cloned().fold(0.0, f64::max) * 100.0, 4),
        herfindahl_index: round_f64(weights.iter().map(|w| w * w).sum(), 4),
    }
}

fn sentiment_step(report: &SentimentReport) -> SentimentStep {
    SentimentStep {
        overall_sentiment: market_view(report.portfolio_summary.overall_sentiment),
        confidence: report.portfolio_summary.average_confidence,
        stock_sentiments: report
            .stock_sentiments
            .iter()
            .map(|s| StockSignal {
                symbol: s.symbol.clone(),
                sentiment: label_title(s.analysis.sentiment),
                score: s.analysis.confidence,
            })
            .collect(),
    }
}

fn hedge_instructions(
    risk: &RiskFactors,
    exposure: &SectorExposure,
    news_impact: f64,
) -> Vec<HedgeInstruction> {
    let mut instructions = Vec::new();

    if risk.volatility_risk || risk.correlation_risk {
        instructions.push(HedgeInstruction {
            instrument: "NIFTY PUT Options (21000 strike)",
            action: HedgeAction::Buy,
            allocation_pct: 2.5,
            cost_pct: 0.3,
            rationale: "Portfolio beta hedging against market downside",
        });
    }
    if exposure.materials > 40.0 {
        instructions.push(HedgeInstruction {
            instrument: "Gold Futures",
            action: HedgeAction::Sell,
            allocation_pct: 1.2,
            cost_pct: 0.1,
            rationale: "Reduce gold overexposure through futures overlay",
        });
    }
    if news_impact < -0.3 {
        instructions.push(HedgeInstruction {
            instrument: "VIX Call Options",
            action: HedgeAction::Buy,
            allocation_pct: 1.0,
            cost_pct: 0.2,
            rationale: "Volatility hedge for negative sentiment period",
        });
    }
    instructions
}

pub fn analyze(
    pl: &Result<PortfolioPl, PortfolioError>,
    report: &SentimentReport,
) -> AdvancedHedgeAnalysis {
    let (total_value, positions): (Decimal, Vec<(String, Decimal)>) = match pl {
        Ok(pl) if pl.totals.total_current_value > Decimal::ZERO => (
            pl.totals.total_current_value,
            pl.details
                .iter()
                .map(|line| (line.instrument.clone(), line.current_value))
                .collect(),
        ),
        _ => {
            tracing::warn!("⚠️ Advanced hedge using fallback positions");
            (FALLBACK_PORTFOLIO_VALUE, fallback_positions())
        }
    };

    // Step 1
    let sector_exposure = SectorExposure {
        materials: MATERIALS_EXPOSURE,
        energy: 20.8,
        mutual_funds: 34.0,
    };
    let portfolio = PortfolioAnalysis {
        total_value,
        num_holdings: positions.len(),
        concentration: concentration(&positions, total_value),
        sector_exposure,
    };

    // Step 2
    let news = NewsAnalysis {
        sources_processed: 4,
        articles_analyzed: 247,
        relevant_articles: 34,
        key_themes: vec![
            Theme { theme: "Gold Rally", sentiment: 0.8, relevance: 0.9 },
            Theme { theme: "Energy Volatility", sentiment: -0.3, relevance: 0.7 },
            Theme { theme: "Market Correction Risk", sentiment: -0.6, relevance: 0.8 },
        ],
    };

    // Step 3
    let sentiment = sentiment_step(report);

    // Step 4
    let sentiment_momentum = if sentiment.overall_sentiment == "Bullish" { 0.68 } else { -0.32 };
    let news_impact = round_f64(
        news.key_themes.iter().map(|t| t.sentiment * t.relevance).sum::<f64>()
            / news.key_themes.len() as f64,
        4,
    );
    let signals = SignalFeatures {
        sentiment_score: sentiment.confidence,
        sentiment_momentum,
        volume_anomaly: 0.15,
        news_impact,
        mention_count: news.relevant_articles,
        surprise_factor: -0.12,
    };

    // Step 5
    let sentiment_alpha = sentiment_momentum * 0.05;
    let adjusted_return = round_f64(BASELINE_RETURN + sentiment_alpha, 4);
    let quant = QuantAnalysis {
        baseline_expected_return: BASELINE_RETURN,
        sentiment_adjusted_return: adjusted_return,
        volatility_forecast: VOLATILITY_FORECAST,
        beta_estimate: 0.89,
        correlation_matrix: CorrelationMatrix {
            market_correlation: MARKET_CORRELATION,
            intra_portfolio_correlation: 0.42,
        },
    };

    // Step 6
    let risk_factors = RiskFactors {
        concentration_risk: portfolio.concentration.herfindahl_index > 0.25,
        sector_concentration: portfolio.sector_exposure.max() > 40.0,
        volatility_risk: quant.volatility_forecast > 0.15,
        correlation_risk: quant.correlation_matrix.market_correlation > 0.7,
    };
    let instructions = hedge_instructions(&risk_factors, &portfolio.sector_exposure, news_impact);
    let hedge_cost = round_f64(instructions.iter().map(|h| h.cost_pct).sum(), 2);

    // Step 7
    let explanations = Explanations {
        primary_risk: format!(
            "High concentration in materials sector ({:.1}%) increases portfolio volatility",
            portfolio.sector_exposure.materials
        ),
        secondary_risk: format!(
            "Strong market correlation ({:.2}) amplifies systematic risk",
            MARKET_CORRELATION
        ),
        hedge_logic: "Protective puts provide downside protection while maintaining upside exposure",
        cost_benefit: format!(
            "Expected cost {:.1}% vs {:.1}% risk reduction",
            hedge_cost, RISK_REDUCTION_PCT
        ),
        sentiment_impact: format!(
            "Current {} sentiment suggests {:+.1}% alpha adjustment",
            sentiment.overall_sentiment,
            sentiment_alpha * 100.0
        ),
    };

    // Step 8
    let backtest = BacktestResults {
        test_period: "12 months",
        strategy_performance: StrategyPerformance {
            win_rate: 0.73,
            avg_return: adjusted_return,
            volatility: round_f64(VOLATILITY_FORECAST * 0.77, 4),
            sharpe_ratio: 1.42,
            max_drawdown_reduction: 0.34,
        },
        transaction_costs: TransactionCosts {
            avg_cost_per_trade: 0.45,
            annual_hedge_cost: hedge_cost,
        },
        scenario_analysis: ScenarioAnalysis {
            bull_market: ScenarioOutcome { hedge_drag: -0.6, protection: 0.0 },
            bear_market: ScenarioOutcome { hedge_drag: 0.0, protection: RISK_REDUCTION_PCT },
            sideways: ScenarioOutcome { hedge_drag: -0.3, protection: 8.2 },
        },
    };

    let summary = AdvancedHedgeSummary {
        total_portfolio_value: total_value,
        risk_reduction_pct: RISK_REDUCTION_PCT,
        expected_hedge_cost_pct: hedge_cost,
        recommended_actions: instructions.len(),
        confidence_score: sentiment.confidence,
    };

    AdvancedHedgeAnalysis {
        analysis_steps: AnalysisSteps {
            step_1_portfolio: portfolio,
            step_2_text_ingestion: news,
            step_3_sentiment: sentiment,
            step_4_signal_engineering: signals,
            step_5_quant_signals: quant,
            step_6_optimization: OptimizationStep {
                risk_factors,
                hedge_recommendations: instructions,
            },
            step_7_explainability: explanations,
            step_8_backtesting: backtest,
        },
        summary,
    }
}

/// Runs the walkthrough against the fixed portfolio headlines.
pub fn analyze_with_portfolio_news(pl: &Result<PortfolioPl, PortfolioError>) -> AdvancedHedgeAnalysis {
    analyze(pl, &sentiment::portfolio_report(sentiment::PORTFOLIO_NEWS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> Result<PortfolioPl, PortfolioError> {
        Err(PortfolioError::CalculationFailed("boom".into()))
    }

    #[test]
    fn fallback_positions_drive_concentration() {
        let analysis = analyze_with_portfolio_news(&failed());
        let step1 = &analysis.analysis_steps.step_1_portfolio;

        assert_eq!(step1.total_value, dec!(234170.23));
        assert_eq!(step1.num_holdings, 4);
        // Motilal MF is the largest position at ~54.8%
        assert!((step1.concentration.top_holding_weight - 54.84).abs() < 0.01);
        assert!(step1.concentration.herfindahl_index > 0.25);
        assert!(analysis.analysis_steps.step_6_optimization.risk_factors.concentration_risk);
    }

    #[test]
    fn bullish_headlines_flow_into_signals() {
        let analysis = analyze_with_portfolio_news(&failed());
        let steps = &analysis.analysis_steps;

        assert_eq!(steps.step_3_sentiment.overall_sentiment, "Bullish");
        assert_eq!(steps.step_3_sentiment.stock_sentiments.len(), 4);
        assert_eq!(steps.step_4_signal_engineering.sentiment_momentum, 0.68);
        assert_eq!(steps.step_5_quant_signals.sentiment_adjusted_return, 0.158);
        assert_eq!(
            steps.step_7_explainability.sentiment_impact,
            "Current Bullish sentiment suggests +3.4% alpha adjustment"
        );
    }

    #[test]
    fn hedges_follow_risk_factors() {
        let analysis = analyze_with_portfolio_news(&failed());
        let hedges = &analysis.analysis_steps.step_6_optimization.hedge_recommendations;

        // Volatility/correlation put and materials overlay; news impact is mildly positive
        assert_eq!(hedges.len(), 2);
        assert_eq!(hedges[0].action, HedgeAction::Buy);
        assert_eq!(hedges[1].instrument, "Gold Futures");
        assert_eq!(analysis.summary.expected_hedge_cost_pct, 0.4);
        assert_eq!(analysis.summary.recommended_actions, 2);
        assert_eq!(
            analysis.analysis_steps.step_7_explainability.cost_benefit,
            "Expected cost 0.4% vs 23.4% risk reduction"
        );
    }

    #[test]
    fn bearish_report_turns_momentum_negative() {
        let report = sentiment::portfolio_report(&[(
            "OIL",
            "Oil collapse deepens as crisis drives severe decline",
        )]);

        let analysis = analyze(&failed(), &report);

        assert_eq!(analysis.analysis_steps.step_3_sentiment.overall_sentiment, "Bearish");
        assert_eq!(analysis.analysis_steps.step_4_signal_engineering.sentiment_momentum, -0.32);
    }

    #[test]
    fn step_keys_keep_dashboard_contract() {
        let analysis = analyze_with_portfolio_news(&failed());
        let json = serde_json::to_value(&analysis).unwrap();
        let steps = json["analysis_steps"].as_object().unwrap();

        assert!(steps.contains_key("step_3_finbert_sentiment"));
        assert!(!steps.contains_key("step_3_sentiment"));
        assert_eq!(steps.len(), 8);
    }

    #[test]
    fn tiny_total_does_not_panic() {
        let positions = vec![
            ("LONG".to_string(), Decimal::MAX),
            ("SHORT".to_string(), -(Decimal::MAX - dec!(1))),
        ];
        let result = concentration(&positions, dec!(1));
        assert!(result.top_holding_weight > 100.0);
    }
}
