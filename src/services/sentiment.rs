//! Lexicon-weighted financial sentiment.
//!
//! Scores a headline by substring hits against three polarity tiers per side
//! plus a flat boost for finance-context terms. Deterministic, no model state.

use crate::utils::round_f64;
use std::cmp::Ordering;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const METHOD: &str = "lexicon_weighted";

/// A weighted keyword tier.
pub struct Tier {
    pub weight: f64,
    pub words: &'static [&'static str],
}

pub const POSITIVE_TIERS: [Tier; 3] = [
    Tier {
        weight: 0.3,
        words: &[
            "exceptional", "stellar", "outperform", "breakthrough", "surge", "exceeding",
            "robust", "superior",
        ],
    },
    Tier {
        weight: 0.2,
        words: &[
            "strong", "growth", "increase", "gain", "rising", "improved", "bullish",
            "optimistic", "momentum",
        ],
    },
    Tier {
        weight: 0.1,
        words: &["steady", "stable", "recovering", "upbeat", "favorable", "encouraging"],
    },
];

pub const NEGATIVE_TIERS: [Tier; 3] = [
    Tier {
        weight: 0.3,
        words: &[
            "crisis", "collapse", "plunge", "devastating", "catastrophic", "severe", "alarming",
        ],
    },
    Tier {
        weight: 0.2,
        words: &[
            "decline", "fall", "loss", "weak", "pressure", "risk", "concern", "disappointing",
            "bearish",
        ],
    },
    Tier {
        weight: 0.1,
        words: &["uncertain", "volatile", "challenge", "cautious", "mixed", "sluggish"],
    },
];

pub const CONTEXT_TERMS: &[&str] = &[
    "etf", "fund", "investment", "portfolio", "quarterly", "earnings", "revenue", "production",
    "market", "sector", "industry", "economic",
];

const CONTEXT_BOOST: f64 = 0.05;
const HIGH_PERCENT_THRESHOLD: f64 = 10.0;
const HIGH_PERCENT_BONUS: f64 = 0.2;
const MIN_CONFIDENCE: f64 = 0.6;
const MAX_CONFIDENCE: f64 = 0.95;

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid percent regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentScore {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub scores: ClassProbabilities,
    pub method: &'static str,
}

fn tier_score(text: &str, tiers: &[Tier]) -> f64 {
    tiers
        .iter()
        .map(|tier| tier.weight * tier.words.iter().filter(|w| text.contains(*w)).count() as f64)
        .sum()
}

fn hundredths(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

fn average_percentage(text: &str) -> Option<f64> {
    let values: Vec<f64> = PERCENT_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn score(text: &str) -> SentimentScore {
    let lower = text.to_lowercase();

    let context_boost =
        CONTEXT_TERMS.iter().filter(|term| lower.contains(*term)).count() as f64 * CONTEXT_BOOST;

    let mut positive = tier_score(&lower, &POSITIVE_TIERS) + context_boost;
    let negative = tier_score(&lower, &NEGATIVE_TIERS);

    if average_percentage(text).is_some_and(|avg| avg > HIGH_PERCENT_THRESHOLD) {
        positive += HIGH_PERCENT_BONUS;
    }

    // Compare in hundredths so 0.2 + 0.1 ties with 0.3
    let (sentiment, raw_confidence) = match hundredths(positive).cmp(&hundredths(negative)) {
        Ordering::Greater => (SentimentLabel::Positive, 0.75 + (positive * 0.1).min(0.2)),
        Ordering::Less => (SentimentLabel::Negative, 0.75 + (negative * 0.1).min(0.2)),
        Ordering::Equal => (SentimentLabel::Neutral, 0.65 + context_boost),
    };

    let confidence = raw_confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    let rest = 1.0 - confidence;
    let scores = match sentiment {
        SentimentLabel::Positive => ClassProbabilities {
            positive: confidence,
            negative: rest * 0.3,
            neutral: rest * 0.7,
        },
        SentimentLabel::Negative => ClassProbabilities {
            positive: rest * 0.3,
            negative: confidence,
            neutral: rest * 0.7,
        },
        SentimentLabel::Neutral => ClassProbabilities {
            positive: rest * 0.5,
            negative: rest * 0.5,
            neutral: confidence,
        },
    };

    SentimentScore {
        sentiment,
        confidence: round_f64(confidence, 4),
        scores: ClassProbabilities {
            positive: round_f64(scores.positive, 4),
            negative: round_f64(scores.negative, 4),
            neutral: round_f64(scores.neutral, 4),
        },
        method: METHOD,
    }
}

/// Headlines scored by the sentiment endpoint, one per portfolio holding.
pub const PORTFOLIO_NEWS: &[(&str, &str)] = &[
    (
        "GOLD1",
        "Gold ETF experiences strong institutional inflows as central bank policies drive safe haven demand amid global economic uncertainty and inflation hedging strategies",
    ),
    (
        "NATIONALUM",
        "National Aluminium Company reports exceptional quarterly performance with 15% YoY production growth, driven by robust automotive demand and infrastructure spending surge",
    ),
    (
        "OIL",
        "Oil and Natural Gas Corporation announces significant offshore discovery with estimated reserves exceeding expectations, projecting 20% production increase over next 24 months",
    ),
    (
        "MOTILAL",
        "Motilal Oswal Large and Midcap Fund demonstrates superior alpha generation through disciplined stock selection, outperforming benchmark by 320 basis points year-to-date",
    ),
];

#[derive(Debug, Clone, Serialize)]
pub struct StockSentiment {
    pub symbol: String,
    pub news: String,
    #[serde(flatten)]
    pub analysis: SentimentScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct Standout {
    pub symbol: String,
    pub news: String,
    pub confidence: f64,
    pub method: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentSummary {
    pub total_stocks: usize,
    pub positive_sentiment: usize,
    pub negative_sentiment: usize,
    pub neutral_sentiment: usize,
    pub overall_sentiment: SentimentLabel,
    pub average_confidence: f64,
    pub most_positive: Option<Standout>,
    pub most_negative: Option<Standout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub portfolio_summary: SentimentSummary,
    pub stock_sentiments: Vec<StockSentiment>,
}

/// Scores each `(symbol, headline)` pair and summarises the portfolio mood.
pub fn portfolio_report(news: &[(&str, &str)]) -> SentimentReport {
    let stock_sentiments: Vec<StockSentiment> = news
        .iter()
        .map(|(symbol, headline)| StockSentiment {
            symbol: symbol.to_string(),
            news: headline.to_string(),
            analysis: score(headline),
        })
        .collect();

    let count = |label: SentimentLabel| {
        stock_sentiments
            .iter()
            .filter(|s| s.analysis.sentiment == label)
            .count()
    };
    let positive_sentiment = count(SentimentLabel::Positive);
    let negative_sentiment = count(SentimentLabel::Negative);
    let neutral_sentiment = count(SentimentLabel::Neutral);

    let overall_sentiment = if positive_sentiment > negative_sentiment {
        SentimentLabel::Positive
    } else if negative_sentiment > positive_sentiment {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    let average_confidence = if stock_sentiments.is_empty() {
        0.0
    } else {
        let total: f64 = stock_sentiments.iter().map(|s| s.analysis.confidence).sum();
        round_f64(total / stock_sentiments.len() as f64, 4)
    };

    let standout = |probability: fn(&ClassProbabilities) -> f64| {
        // First of equal maxima wins
        stock_sentiments
            .iter()
            .fold(None::<&StockSentiment>, |best, s| match best {
                Some(b) if probability(&b.analysis.scores) >= probability(&s.analysis.scores) => {
                    Some(b)
                }
                _ => Some(s),
            })
            .map(|s| Standout {
                symbol: s.symbol.clone(),
                news: s.news.clone(),
                confidence: probability(&s.analysis.scores),
                method: s.analysis.method,
            })
    };

    SentimentReport {
        portfolio_summary: SentimentSummary {
            total_stocks: stock_sentiments.len(),
            positive_sentiment,
            negative_sentiment,
            neutral_sentiment,
            overall_sentiment,
            average_confidence,
            most_positive: standout(|p| p.positive),
            most_negative: standout(|p| p.negative),
        },
        stock_sentiments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gold_etf_headline_is_positive() {
        let result = score(PORTFOLIO_NEWS[0].1);

        assert_eq!(result.sentiment, SentimentLabel::Positive);
        assert!((0.6..=0.95).contains(&result.confidence));
        // strong (0.2) + etf/economic context (0.1) vs uncertain (0.1)
        assert_eq!(result.confidence, 0.78);
    }

    #[test]
    fn scoring_is_deterministic() {
        for (_, headline) in PORTFOLIO_NEWS {
            assert_eq!(score(headline), score(headline));
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let texts = [
            "Market crisis deepens as collapse fears spread across the sector",
            "Nothing to see here",
            "etf fund investment portfolio quarterly earnings revenue production market sector industry economic",
        ];
        for text in texts.iter().chain(PORTFOLIO_NEWS.iter().map(|(_, h)| h)) {
            let s = score(text);
            let sum = s.scores.positive + s.scores.negative + s.scores.neutral;
            assert!((sum - 1.0).abs() < 1e-3, "{} sums to {}", text, sum);
            assert!(s.scores.positive >= 0.0 && s.scores.negative >= 0.0 && s.scores.neutral >= 0.0);
            assert!((0.6..=0.95).contains(&s.confidence));
        }
    }

    #[test]
    fn ties_are_neutral() {
        let result = score("Results were steady but sluggish");
        assert_eq!(result.sentiment, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.65);
        assert_eq!(result.scores.positive, result.scores.negative);
    }

    #[test]
    fn negative_keywords_win() {
        let result = score("Severe decline and weak guidance raise concern");
        assert_eq!(result.sentiment, SentimentLabel::Negative);
        assert!(result.scores.negative > result.scores.positive);
    }

    #[test]
    fn large_percentages_tip_towards_positive() {
        // "volatile" alone would be negative 0.1; a 25% figure adds 0.2 to positive
        let result = score("Shares volatile after 25% move");
        assert_eq!(result.sentiment, SentimentLabel::Positive);

        let small = score("Shares volatile after 5% move");
        assert_eq!(small.sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn report_summarises_fixed_headlines() {
        let report = portfolio_report(PORTFOLIO_NEWS);
        let summary = &report.portfolio_summary;

        assert_eq!(summary.total_stocks, 4);
        assert_eq!(summary.positive_sentiment, 4);
        assert_eq!(summary.overall_sentiment, SentimentLabel::Positive);
        assert!(summary.most_positive.is_some());
        assert_eq!(report.stock_sentiments[0].symbol, "GOLD1");
    }

    #[test]
    fn empty_report_is_neutral() {
        let report = portfolio_report(&[]);
        assert_eq!(report.portfolio_summary.overall_sentiment, SentimentLabel::Neutral);
        assert_eq!(report.portfolio_summary.average_confidence, 0.0);
        assert!(report.portfolio_summary.most_negative.is_none());
    }

    #[test]
    fn equal_weights_tie_despite_float_rounding() {
        // crisis (0.3) against strong (0.2) + steady (0.1)
        let result = score("crisis meets strong and steady hands");

        assert_eq!(result.sentiment, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.65);
    }
}
