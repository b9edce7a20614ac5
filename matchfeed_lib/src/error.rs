//! Error types for the library layer.

use std::fmt;

use crate::document::DocumentError;

/// Which external source a team identifier belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeamFeed {
    /// Numeric ids used by the XML statistics feed.
    Bundesliga,
    /// Canonical names as used throughout the pipeline.
    Canonical,
    /// Display names and slugs used by the HTML results site.
    ResultDb,
}

impl fmt::Display for TeamFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundesliga => write!(f, "bundesliga"),
            Self::Canonical => write!(f, "canonical"),
            Self::ResultDb => write!(f, "resultdb"),
        }
    }
}

/// How a failure must be treated by the round loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The two sources disagree about team identity. Always aborts the round.
    Integrity,
    /// Missing or unusable data for one unit of work. The caller may skip it.
    Recoverable,
}

/// Errors produced while crawling and assembling feature rows.
#[derive(thiserror::Error, Debug)]
pub enum CrawlError {
    /// Fetching a page failed (bad URL, network, status, blank body).
    #[error("fetch failed: {0}")]
    Fetch(#[from] matchfeed_api::Error),
    /// A payload could not be parsed.
    #[error("parse failed: {0}")]
    Parse(#[from] DocumentError),
    /// The identifier is absent from the team directory.
    #[error("no {feed} team mapping for '{key}'")]
    UnknownTeamMapping { feed: TeamFeed, key: String },
    /// The feed names a team differently than the directory does.
    #[error("team with id {id} is named '{crawled}' in the feed, but the directory maps it to '{mapped}'")]
    IllegalTeamMapping {
        id: u32,
        crawled: String,
        mapped: String,
    },
    /// No node for a known team after a full scan.
    #[error("team '{0}' not found in document")]
    TeamNotFound(String),
    /// The results table used an outcome code other than W, L or D.
    #[error("invalid result state '{0}'")]
    InvalidResultCode(String),
    /// A score cell was not of the form `H-A`.
    #[error("invalid score '{0}'")]
    InvalidScore(String),
    /// A numeric field could not be parsed.
    #[error("invalid number '{value}' for {field}")]
    InvalidNumber { field: String, value: String },
    /// An expected element or attribute is absent.
    #[error("missing {0}")]
    MissingNode(String),
    /// The document has the right syntax but the wrong shape.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// The results table is too short for the requested round.
    #[error("results table has {rows} rows, cannot look up round {round}")]
    RoundOutOfRange { round: u32, rows: usize },
    /// User-provided input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The team directory seed data is inconsistent.
    #[error("team seed error: {0}")]
    Seed(String),
}

impl CrawlError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownTeamMapping { .. } | Self::IllegalTeamMapping { .. } => {
                Severity::Integrity
            }
            _ => Severity::Recoverable,
        }
    }

    pub fn is_integrity_violation(&self) -> bool {
        self.severity() == Severity::Integrity
    }
}
