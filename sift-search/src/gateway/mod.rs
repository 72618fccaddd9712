//! Search gateway, page fetcher and result ranking.
//!
//! The gateways compose the lower layers into the two operations external
//! callers use: a ranked search and a page fetch. Both always return a
//! well-formed value; failures are carried inside it.

pub mod fetch;
pub mod ranking;
pub mod search;

pub use fetch::{PageFetcher, PageWithQuotes};
pub use ranking::{rank, rank_with, recency_score};
pub use search::{SearchGateway, SearchRequest, parse_site_list};
