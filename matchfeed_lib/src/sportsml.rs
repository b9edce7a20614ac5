//! Vocabulary of the Bundesliga SportsML feed and helpers over its team nodes.

use crate::document::{Document, Element};
use crate::error::CrawlError;

pub const TEAM: &str = "team";
pub const TEAM_METADATA: &str = "team-metadata";
pub const TEAM_KEY: &str = "team-key";
pub const NAME: &str = "name";
pub const FULL_NAME: &str = "full";

pub const SPORTS_CONTENT_CODE: &str = "sports-content-code";
pub const CODE_TYPE: &str = "code-type";
pub const CODE_KEY: &str = "code-key";
pub const CODE_NAME: &str = "code-name";
pub const TEAM_CODE_PREFIX: &str = "soccer.t_";

pub const TEAM_STATS: &str = "team-stats";
pub const OUTCOME_TOTALS: &str = "outcome-totals";
pub const STANDING_POINTS: &str = "standing-points";
pub const POINTS_FOR: &str = "points-scored-for";
pub const POINTS_AGAINST: &str = "points-scored-against";

pub const GROUP_STATS: &str = "group-stats";
pub const TEAM_STATS_SOCCER: &str = "team-stats-soccer";
pub const STATS_OFFENSIVE: &str = "stats-soccer-offensive";
pub const STATS_FOUL: &str = "stats-soccer-foul";

/// All `team` elements in document order.
pub fn team_nodes(doc: &Document) -> Vec<&Element> {
    doc.descendants(TEAM)
}

/// Numeric id from `team-metadata@team-key`.
pub fn team_id(team: &Element) -> Result<u32, CrawlError> {
    let key = team
        .child(TEAM_METADATA)
        .and_then(|meta| meta.attr(TEAM_KEY))
        .ok_or_else(|| CrawlError::MissingNode(format!("{TEAM_METADATA}@{TEAM_KEY}")))?;
    parse_u32(TEAM_KEY, key)
}

/// Full display name from `team-metadata > name@full`.
pub fn team_full_name(team: &Element) -> Result<&str, CrawlError> {
    team.path(&[TEAM_METADATA, NAME])
        .and_then(|name| name.attr(FULL_NAME))
        .ok_or_else(|| CrawlError::MissingNode(format!("{TEAM_METADATA} > {NAME}@{FULL_NAME}")))
}

/// The `team` element whose full name is `name`. Nodes without a name are skipped.
pub fn find_team<'a>(doc: &'a Document, name: &str) -> Result<&'a Element, CrawlError> {
    team_nodes(doc)
        .into_iter()
        .find(|node| team_full_name(node).map(|n| n == name).unwrap_or(false))
        .ok_or_else(|| CrawlError::TeamNotFound(name.to_string()))
}

/// Parses the numeric id out of a `soccer.t_<id>` code key.
pub fn parse_code_key(key: &str) -> Result<u32, CrawlError> {
    let digits = key
        .trim()
        .strip_prefix(TEAM_CODE_PREFIX)
        .ok_or_else(|| CrawlError::MalformedDocument(format!("unexpected {CODE_KEY} '{key}'")))?;
    parse_u32(CODE_KEY, digits)
}

pub(crate) fn parse_u32(field: &str, value: &str) -> Result<u32, CrawlError> {
    value.trim().parse().map_err(|_| CrawlError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn parse_i64(field: &str, value: &str) -> Result<i64, CrawlError> {
    value.trim().parse().map_err(|_| CrawlError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}
