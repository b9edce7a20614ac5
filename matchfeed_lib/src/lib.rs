//! Library layer for matchfeed: rate-limited fetching, feed parsing, team
//! identity, and assembly of per-match feature rows.
//!
//! Wraps the `matchfeed_api` transport with per-run caches, pacing between
//! requests, and the extractors for standings, tracking stats and recent form.

pub mod assembler;
pub mod cache;
pub mod document;
pub mod endpoints;
pub mod error;
pub mod features;
pub mod fetcher;
pub mod ranking;
pub mod results;
pub mod sportsml;
pub mod stats;
pub mod teams;
pub mod validation;

pub use matchfeed_api;
pub use matchfeed_api::Charset;

pub use assembler::MatchFeatureAssembler;
pub use cache::{Cache, CrawlCache, MemoryCache, NoopCache};
pub use document::{parse_document, Document, DocumentError, DocumentKind, Element};
pub use endpoints::FeedEndpoints;
pub use error::{CrawlError, Severity, TeamFeed};
pub use features::{FeatureRow, TeamFeatures, ROW_TOKENS};
pub use fetcher::{FetchConfig, RateLimitedFetcher};
pub use ranking::{build_ranking, standing_stats, RankingTable, StandingStats};
pub use results::{Fixture, FormRecord, ResultsTable, Venue};
pub use stats::{extract_team_stats, AverageRoundStats, StatValue, TeamPerformance, TrackedStat};
pub use teams::{TeamDirectory, TeamEntry};
