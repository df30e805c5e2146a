//! Resolution-source catalog.
//!
//! Maps market domains to the external endpoints expected to carry
//! resolution-relevant information, with per-source keyword lists.
//! API keys are referenced by `{PLACEHOLDER}` in the URL templates and
//! substituted from the environment at catalog build time.

use std::collections::HashMap;
use tracing::debug;

use crate::config::AppConfig;
use crate::types::MarketDomain;

// ---------------------------------------------------------------------------
// Catalog data
// ---------------------------------------------------------------------------

struct SourceEntry {
    domain: MarketDomain,
    urls: &'static [&'static str],
}

const CATALOG: &[SourceEntry] = &[
    SourceEntry {
        domain: MarketDomain::Politics,
        urls: &[
            "https://newsapi.org/v2/everything?domains=whitehouse.gov,reuters.com,bbc.com&apiKey={NEWS_API_KEY}",
            "https://feeds.bbci.co.uk/news/rss.xml",
        ],
    },
    SourceEntry {
        domain: MarketDomain::Crypto,
        urls: &[
            "https://www.sec.gov/news/pressreleases.rss",
            "https://www.coindesk.com/arc/outboundfeeds/rss/",
        ],
    },
    SourceEntry {
        domain: MarketDomain::Economy,
        urls: &[
            "https://api.stlouisfed.org/fred/series/observations?series_id=FEDFUNDS&api_key={FRED_API_KEY}",
            "https://www.federalreserve.gov/feeds/press_all.xml",
        ],
    },
];

/// Prediction-market listing endpoints are relevant to every domain.
const SHARED_URLS: &[&str] = &["https://gamma-api.polymarket.com/markets"];

// ---------------------------------------------------------------------------
// Per-source keywords
// ---------------------------------------------------------------------------

struct SourceKeywords {
    url_fragment: &'static str,
    keywords: &'static [&'static str],
}

const SOURCE_KEYWORDS: &[SourceKeywords] = &[
    SourceKeywords {
        url_fragment: "whitehouse.gov",
        keywords: &[
            "election", "trump", "biden", "president", "victory", "win",
            "results", "campaign", "vote", "announcement",
        ],
    },
    SourceKeywords {
        url_fragment: "newsapi.org",
        keywords: &[
            "election", "trump", "biden", "president", "victory", "win",
            "results", "campaign", "vote", "announcement",
        ],
    },
    SourceKeywords {
        url_fragment: "sec.gov",
        keywords: &[
            "etf", "approval", "sec", "bitcoin", "ethereum", "approved",
            "rejected", "filing", "application", "decision",
        ],
    },
    SourceKeywords {
        url_fragment: "federalreserve.gov",
        keywords: &[
            "rate", "fed", "federal", "reserve", "increase", "decrease",
            "hold", "decision", "fomc", "interest", "cut",
        ],
    },
    SourceKeywords {
        url_fragment: "stlouisfed.org",
        keywords: &[
            "rate", "fed", "federal", "reserve", "increase", "decrease",
            "hold", "decision", "fomc", "interest", "cut",
        ],
    },
    SourceKeywords {
        url_fragment: "polymarket.com",
        keywords: &[
            "market", "prediction", "trade", "price", "volume",
            "settlement", "bet", "outcome",
        ],
    },
];

const DEFAULT_KEYWORDS: &[&str] = &["announcement", "official", "result", "news", "update"];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Resolved catalog of monitored endpoints, keyed by market domain.
pub struct SourceCatalog {
    by_domain: HashMap<MarketDomain, Vec<String>>,
}

impl SourceCatalog {
    /// Build the catalog, substituting API-key placeholders from the
    /// environment. Missing keys substitute as empty strings — the
    /// affected endpoint then simply fails its poll, which the monitor
    /// records as inaccessible.
    pub fn from_env() -> Self {
        let news_key = AppConfig::resolve_env("NEWS_API_KEY").unwrap_or_default();
        let fred_key = AppConfig::resolve_env("FRED_API_KEY").unwrap_or_default();

        debug!(
            news_key = !news_key.is_empty(),
            fred_key = !fred_key.is_empty(),
            "Resolution-source API keys resolved"
        );

        let mut by_domain = HashMap::new();
        for entry in CATALOG {
            let urls = entry
                .urls
                .iter()
                .map(|u| {
                    u.replace("{NEWS_API_KEY}", &news_key)
                        .replace("{FRED_API_KEY}", &fred_key)
                })
                .collect();
            by_domain.insert(entry.domain, urls);
        }

        Self { by_domain }
    }

    /// Endpoints relevant to one market domain: the domain's own sources
    /// plus the shared prediction-market listings.
    pub fn endpoints_for(&self, domain: MarketDomain) -> Vec<String> {
        let mut urls: Vec<String> = self
            .by_domain
            .get(&domain)
            .cloned()
            .unwrap_or_default();
        urls.extend(SHARED_URLS.iter().map(|u| u.to_string()));
        urls
    }

    /// The deduplicated union of endpoints across all catalogued domains.
    pub fn all_endpoints(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for entry in CATALOG {
            if let Some(domain_urls) = self.by_domain.get(&entry.domain) {
                for url in domain_urls {
                    if !urls.contains(url) {
                        urls.push(url.clone());
                    }
                }
            }
        }
        for url in SHARED_URLS {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
        urls
    }
}

/// Keywords expected to matter on a given source, matched on URL fragments.
pub fn source_keywords(url: &str) -> Vec<String> {
    let url_lower = url.to_lowercase();
    for entry in SOURCE_KEYWORDS {
        if url_lower.contains(entry.url_fragment) {
            return entry.keywords.iter().map(|k| k.to_string()).collect();
        }
    }
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_for_economy() {
        let catalog = SourceCatalog::from_env();
        let urls = catalog.endpoints_for(MarketDomain::Economy);
        assert!(urls.iter().any(|u| u.contains("federalreserve.gov")));
        // Shared prediction-market listing is always included
        assert!(urls.iter().any(|u| u.contains("polymarket.com")));
    }

    #[test]
    fn test_endpoints_for_unlisted_domain() {
        let catalog = SourceCatalog::from_env();
        let urls = catalog.endpoints_for(MarketDomain::Sports);
        // No dedicated sources, but the shared listing still applies
        assert_eq!(urls.len(), SHARED_URLS.len());
    }

    #[test]
    fn test_all_endpoints_deduplicated() {
        let catalog = SourceCatalog::from_env();
        let urls = catalog.all_endpoints();
        let mut seen = std::collections::HashSet::new();
        for url in &urls {
            assert!(seen.insert(url), "duplicate endpoint: {url}");
        }
        assert!(urls.len() >= 7);
    }

    #[test]
    fn test_source_keywords_sec() {
        let kws = source_keywords("https://www.sec.gov/news/pressreleases.rss");
        assert!(kws.contains(&"etf".to_string()));
        assert!(kws.contains(&"approval".to_string()));
    }

    #[test]
    fn test_source_keywords_fed() {
        let kws = source_keywords("https://www.federalreserve.gov/feeds/press_all.xml");
        assert!(kws.contains(&"fomc".to_string()));
    }

    #[test]
    fn test_source_keywords_default() {
        let kws = source_keywords("https://unknown.example.com/feed");
        assert_eq!(kws.len(), DEFAULT_KEYWORDS.len());
        assert!(kws.contains(&"announcement".to_string()));
    }
}
