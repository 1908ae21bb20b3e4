//! Keyword heuristic for sustainability scoring

use crate::{AnalysisResult, ProductInput, Recommendation};

/// Starting score before keyword adjustments
pub const BASE_SCORE: i32 = 50;

/// Keywords that raise the score when found in the title
const POSITIVE_KEYWORDS: &[(&str, i32)] = &[
    ("bamboo", 15),
    ("organic", 10),
    ("recycled", 15),
    ("sustainable", 10),
    ("eco", 8),
    ("biodegradable", 12),
    ("reusable", 10),
];

/// Keywords that lower the score when found in the title
const NEGATIVE_KEYWORDS: &[(&str, i32)] = &[
    ("plastic", -15),
    ("disposable", -12),
    ("single-use", -15),
    ("vinyl", -10),
];

/// Positive findings, in reporting order
const POSITIVE_FINDINGS: &[(&str, &str)] = &[
    ("bamboo", "Made from sustainable bamboo"),
    ("recycled", "Uses recycled materials"),
    ("organic", "Organic materials reduce chemical impact"),
];

/// Negative findings, in reporting order
const NEGATIVE_FINDINGS: &[(&str, &str)] = &[
    ("plastic", "Contains plastic components"),
    ("disposable", "Single-use design creates waste"),
];

pub const FALLBACK_POSITIVE: &str = "Product category has room for improvement";
pub const FALLBACK_NEGATIVE: &str = "Limited sustainability certifications visible";

/// A keyword that fired during scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    pub keyword: &'static str,
    pub delta: i32,
}

/// Score a product from its listing text.
///
/// Only the title is weighted. Brand, price and materials are accepted so the
/// signature stays stable when a model backend starts using them.
pub fn score_product(product: &ProductInput) -> AnalysisResult {
    let title = product.title.to_lowercase();
    let _brand = product.brand.to_lowercase();

    let total: i32 = BASE_SCORE
        + matched_keywords(&title)
            .iter()
            .map(|m| m.delta)
            .sum::<i32>();
    let green_score = total.clamp(0, 100) as u8;

    AnalysisResult {
        green_score,
        positives: findings(&title, POSITIVE_FINDINGS, FALLBACK_POSITIVE),
        negatives: findings(&title, NEGATIVE_FINDINGS, FALLBACK_NEGATIVE),
        recommendation: Recommendation::from_score(green_score),
    }
}

/// Every keyword in the scoring tables that occurs in `title`.
///
/// Matching is case-insensitive substring search; each keyword counts at most once.
pub fn matched_keywords(title: &str) -> Vec<KeywordMatch> {
    let title = title.to_lowercase();
    POSITIVE_KEYWORDS
        .iter()
        .chain(NEGATIVE_KEYWORDS)
        .filter(|(keyword, _)| title.contains(keyword))
        .map(|&(keyword, delta)| KeywordMatch { keyword, delta })
        .collect()
}

fn findings(title: &str, table: &[(&str, &str)], fallback: &str) -> Vec<String> {
    let mut out: Vec<String> = table
        .iter()
        .filter(|(keyword, _)| title.contains(keyword))
        .map(|(_, sentence)| sentence.to_string())
        .collect();
    if out.is_empty() {
        out.push(fallback.to_string());
    }
    out
}
