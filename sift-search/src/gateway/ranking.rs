//! Result ranking by source quality, then recency.
//!
//! Sort key: `(tier ascending, recency descending)`, computed once per
//! result. The sort is stable, so results with equal keys keep provider order.
//!
//! Recency score of a date string:
//!
//! | Date contains | Score |
//! |---------------|-------|
//! | nothing (empty) | 0 |
//! | `hour` or `today` | 1000 |
//! | `day` or `yesterday` | 100 |
//! | `week` | 10 |
//! | a `20xx` year | `xx` |
//! | anything else | 0 |

use crate::quality::{self, DomainTiers, QualityTier};
use crate::types::SearchResult;
use regex::Regex;
use std::cmp::Reverse;
use std::sync::LazyLock;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20(\d{2})").unwrap_or_else(|e| panic!("invalid year pattern: {e}")));

/// Rank results with the default domain tables.
pub fn rank(results: Vec<SearchResult>) -> Vec<SearchResult> {
    rank_with(results, &DomainTiers::default())
}

/// Rank results against the given domain tables.
pub fn rank_with(results: Vec<SearchResult>, tiers: &DomainTiers) -> Vec<SearchResult> {
    let mut keyed: Vec<((QualityTier, Reverse<u32>), SearchResult)> = results
        .into_iter()
        .map(|result| (sort_key(&result, tiers), result))
        .collect();

    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, result)| result).collect()
}

fn sort_key(result: &SearchResult, tiers: &DomainTiers) -> (QualityTier, Reverse<u32>) {
    let date = result.published_date.as_deref().unwrap_or_default();
    let tier = quality::classify_with(&result.url, !date.is_empty(), tiers);
    (tier, Reverse(recency_score(date)))
}

/// Recency score of a date string; higher is more recent.
pub fn recency_score(date: &str) -> u32 {
    if date.is_empty() {
        return 0;
    }
    let lower = date.to_lowercase();
    if lower.contains("hour") || lower.contains("today") {
        1000
    } else if lower.contains("day") || lower.contains("yesterday") {
        100
    } else if lower.contains("week") {
        10
    } else {
        YEAR.captures(&lower)
            .and_then(|caps| caps.get(1))
            .and_then(|yy| yy.as_str().parse().ok())
            .unwrap_or(0)
    }
}
