//! Source quality classification.
//!
//! Maps a URL plus the presence of a publication date to a [`QualityTier`].
//! Classification is an ordered rule table; the first matching rule wins:
//!
//! | # | Rule | Tier |
//! |---|------|------|
//! | 1 | no publication date | [`QualityTier::Undated`] |
//! | 2 | domain matches a primary pattern (suffix or substring) | [`QualityTier::Primary`] |
//! | 3 | domain contains a top-journalism pattern | [`QualityTier::TopJournalism`] |
//! | – | anything else, including unparseable URLs | [`QualityTier::Other`] |
//!
//! Rule 1 comes first, so an undated page on a government domain is still
//! [`QualityTier::Undated`].

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Trust tier of a source. Lower numeric value means higher trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// Government, standards and regulatory bodies, academia, investor relations.
    Primary = 1,
    /// Established news organisations.
    TopJournalism = 2,
    /// Other outlets and blogs.
    Other = 3,
    /// Sources without a publication date, whatever their domain.
    Undated = 4,
}

impl QualityTier {
    /// Numeric tier value (1 = most trusted).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::TopJournalism => "top_journalism",
            Self::Other => "other",
            Self::Undated => "undated",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Government, standards, academic and investor-relations patterns.
const PRIMARY_PATTERNS: &[&str] = &[
    // Government
    "gov",
    "mil",
    "europa.eu",
    "parliament.uk",
    "gov.uk",
    "bundesregierung.de",
    "gouvernement.fr",
    // Standards and regulatory bodies
    "sec.gov",
    "fda.gov",
    "epa.gov",
    "cdc.gov",
    "nih.gov",
    "who.int",
    "un.org",
    "oecd.org",
    "imf.org",
    "worldbank.org",
    // Academic and research
    "edu",
    "ac.uk",
    "arxiv.org",
    "nature.com",
    "science.org",
    // Investor relations subdomains
    "ir.",
    "investors.",
    "investor.",
];

const TOP_JOURNALISM_PATTERNS: &[&str] = &[
    "reuters.com",
    "ft.com",
    "wsj.com",
    "nytimes.com",
    "bloomberg.com",
    "economist.com",
    "bbc.com",
    "bbc.co.uk",
    "apnews.com",
    "afp.com",
    "theguardian.com",
    "washingtonpost.com",
    "time.com",
    "forbes.com",
];

/// Domain pattern tables used by [`classify_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainTiers {
    /// Patterns matched by suffix or substring for [`QualityTier::Primary`].
    pub primary: Vec<String>,
    /// Patterns matched by substring for [`QualityTier::TopJournalism`].
    pub top_journalism: Vec<String>,
}

impl Default for DomainTiers {
    fn default() -> Self {
        Self {
            primary: PRIMARY_PATTERNS.iter().map(|p| (*p).to_owned()).collect(),
            top_journalism: TOP_JOURNALISM_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
        }
    }
}

impl DomainTiers {
    fn is_primary(&self, domain: &str) -> bool {
        self.primary
            .iter()
            .any(|p| domain.ends_with(p.as_str()) || domain.contains(p.as_str()))
    }

    fn is_top_journalism(&self, domain: &str) -> bool {
        self.top_journalism.iter().any(|p| domain.contains(p.as_str()))
    }
}

/// What the rules look at.
struct SourceFacts<'a> {
    domain: Option<&'a str>,
    has_date: bool,
}

type TierRule = (fn(&SourceFacts<'_>, &DomainTiers) -> bool, QualityTier);

fn is_undated(facts: &SourceFacts<'_>, _: &DomainTiers) -> bool {
    !facts.has_date
}

fn is_primary_domain(facts: &SourceFacts<'_>, tiers: &DomainTiers) -> bool {
    facts.domain.is_some_and(|d| tiers.is_primary(d))
}

fn is_top_journalism_domain(facts: &SourceFacts<'_>, tiers: &DomainTiers) -> bool {
    facts.domain.is_some_and(|d| tiers.is_top_journalism(d))
}

/// Ordered classification rules. Order is precedence.
const RULES: &[TierRule] = &[
    (is_undated, QualityTier::Undated),
    (is_primary_domain, QualityTier::Primary),
    (is_top_journalism_domain, QualityTier::TopJournalism),
];

/// Classify a source with the default domain tables.
pub fn classify(url: &str, has_date: bool) -> QualityTier {
    classify_with(url, has_date, &DomainTiers::default())
}

/// Classify a source against the given domain tables. Never fails:
/// malformed URLs classify as [`QualityTier::Other`] (or
/// [`QualityTier::Undated`] when undated).
pub fn classify_with(url: &str, has_date: bool, tiers: &DomainTiers) -> QualityTier {
    let domain = host_of(url);
    let facts = SourceFacts {
        domain: domain.as_deref(),
        has_date,
    };

    RULES
        .iter()
        .find(|(applies, _)| applies(&facts, tiers))
        .map_or(QualityTier::Other, |(_, tier)| *tier)
}

/// Display domain of a URL: lowercased host without a leading `www.`.
///
/// Returns an empty string for URLs without a host.
pub fn domain_of(url: &str) -> String {
    host_of(url).unwrap_or_default()
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").map(str::to_owned).unwrap_or(host);
    if host.is_empty() { None } else { Some(host) }
}
