//! Text-analysis utilities.
//!
//! Keyword/domain classification heuristics over free market text:
//! domain categorization, market keyword extraction, resolution-source
//! references, URL extraction, and negation-aware keyword stance.
//! Everything here is pure substring matching — no stemming, no
//! tokenization beyond whitespace splits.

use crate::types::MarketDomain;

// ---------------------------------------------------------------------------
// Domain classification
// ---------------------------------------------------------------------------

struct DomainRule {
    triggers: &'static [&'static str],
    domain: MarketDomain,
}

/// Ordered rules — first match wins.
const DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        triggers: &["fed", "rate", "recession", "gdp", "inflation"],
        domain: MarketDomain::Economy,
    },
    DomainRule {
        triggers: &["trump", "biden", "election", "president"],
        domain: MarketDomain::Politics,
    },
    DomainRule {
        triggers: &["bitcoin", "ethereum", "crypto", "tether", "etf"],
        domain: MarketDomain::Crypto,
    },
    DomainRule {
        triggers: &["match", "game", "sports"],
        domain: MarketDomain::Sports,
    },
    DomainRule {
        triggers: &["covid", "health", "vaccine"],
        domain: MarketDomain::Health,
    },
];

/// Classify a market into a domain from its question + description text.
pub fn categorize_market_domain(question: &str, description: &str) -> MarketDomain {
    let text = format!("{question} {description}").to_lowercase();

    for rule in DOMAIN_RULES {
        if rule.triggers.iter().any(|t| text.contains(t)) {
            return rule.domain;
        }
    }
    MarketDomain::Other
}

// ---------------------------------------------------------------------------
// Market keyword extraction
// ---------------------------------------------------------------------------

/// Trigger substring → canonical keyword the detector correlates on.
const KEYWORD_MAP: &[(&str, &str)] = &[
    ("fed", "federal reserve"),
    ("rate", "rate"),
    ("recession", "recession"),
    ("gdp", "gdp"),
    ("crypto", "crypto"),
    ("bitcoin", "bitcoin"),
    ("ethereum", "ethereum"),
    ("election", "election"),
    ("etf", "etf"),
];

/// Extract the canonical keyword set for a market from its question and
/// description. Order is fixed by the mapping table; duplicates cannot
/// occur since each trigger appears once.
pub fn extract_market_keywords(question: &str, description: &str) -> Vec<String> {
    let text = format!("{question} {description}").to_lowercase();

    KEYWORD_MAP
        .iter()
        .filter(|(trigger, _)| text.contains(trigger))
        .map(|(_, keyword)| keyword.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Resolution-source references
// ---------------------------------------------------------------------------

/// Extract the resolution-source reference from a market description:
/// everything from the phrase "resolution source" onward, if present.
pub fn extract_resolution_source(description: &str) -> Option<String> {
    description
        .to_lowercase()
        .find("resolution source")
        .map(|idx| description[idx..].to_string())
}

/// Extract all http(s) URLs from free text.
pub fn extract_urls(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|w| w.starts_with("http://") || w.starts_with("https://"))
        .map(|w| w.trim_end_matches([',', '.', ')', ']', ';']).to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Keyword stance (negation detection)
// ---------------------------------------------------------------------------

/// How a keyword appears in surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Affirmed,
    Negated,
    NotFound,
}

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "deny", "reject", "decline", "negative", "against",
];

/// Detect whether a keyword occurs in the text and whether a negation
/// word appears within three words of it. Without a nearby negation,
/// an occurrence counts as affirmed.
pub fn keyword_stance(text: &str, keyword: &str) -> Stance {
    let text_lower = text.to_lowercase();
    let keyword_lower = keyword.to_lowercase();

    if !text_lower.contains(&keyword_lower) {
        return Stance::NotFound;
    }

    let words: Vec<&str> = text_lower.split_whitespace().collect();
    let positions: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.contains(&keyword_lower))
        .map(|(i, _)| i)
        .collect();

    for &pos in &positions {
        let lo = pos.saturating_sub(3);
        let hi = (pos + 4).min(words.len());
        for word in &words[lo..hi] {
            if NEGATIONS.iter().any(|neg| word.contains(neg)) {
                return Stance::Negated;
            }
        }
    }

    Stance::Affirmed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
