use crate::models::Holding;
use crate::services::sentiment::SentimentLabel;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: &'static str,
    pub source: &'static str,
    pub timestamp: &'static str,
    pub sentiment: SentimentLabel,
    pub relevance: Relevance,
    pub url: &'static str,
}

/// Curated headlines; the first two are titled after the first two holdings.
pub fn top_news(holdings: &[Holding]) -> Vec<NewsItem> {
    let name = |index: usize, fallback: &str| {
        holdings
            .get(index)
            .map(|h| h.instrument.clone())
            .unwrap_or_else(|| fallback.to_string())
    };

    vec![
        NewsItem {
            title: format!("{} Shows Strong Performance in Q4", name(0, "Market")),
            summary: "Quarterly earnings report shows consistent growth in the industrial sector with positive outlook for the coming quarter.",
            source: "Financial Times",
            timestamp: "2 hours ago",
            sentiment: SentimentLabel::Positive,
            relevance: Relevance::High,
            url: "#",
        },
        NewsItem {
            title: format!("{} Sector Faces Regulatory Changes", name(1, "Energy")),
            summary: "New environmental regulations may impact short-term operations but create long-term sustainability opportunities.",
            source: "Economic Times",
            timestamp: "4 hours ago",
            sentiment: SentimentLabel::Neutral,
            relevance: Relevance::Medium,
            url: "#",
        },
        NewsItem {
            title: "Mutual Fund Market Outlook Remains Optimistic".to_string(),
            summary: "Large and mid-cap funds continue to attract investor interest amid market volatility, showing resilient performance.",
            source: "Money Control",
            timestamp: "6 hours ago",
            sentiment: SentimentLabel::Positive,
            relevance: Relevance::Medium,
            url: "#",
        },
        NewsItem {
            title: "Market Volatility Creates Investment Opportunities".to_string(),
            summary: "Analysts suggest current market conditions present attractive entry points for long-term investors in quality stocks.",
            source: "Bloomberg",
            timestamp: "8 hours ago",
            sentiment: SentimentLabel::Neutral,
            relevance: Relevance::Low,
            url: "#",
        },
    ]
}
