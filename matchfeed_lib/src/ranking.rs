//! League table position and standing stats from a standings document.

use serde::Serialize;

use crate::document::{Document, Element};
use crate::error::CrawlError;
use crate::sportsml::{self, CODE_KEY, CODE_NAME, CODE_TYPE, SPORTS_CONTENT_CODE, TEAM};
use crate::teams::TeamDirectory;

/// Team name → 1-based rank, in the order teams appear in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankingTable {
    entries: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub team: String,
    pub rank: u32,
}

impl RankingTable {
    pub fn rank_of(&self, team: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.team == team)
            .map(|entry| entry.rank)
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, team: String) -> Result<(), CrawlError> {
        if self.rank_of(&team).is_some() {
            return Err(CrawlError::MalformedDocument(format!(
                "team '{team}' is declared twice in the standings"
            )));
        }
        let rank = self.entries.len() as u32 + 1;
        self.entries.push(RankingEntry { team, rank });
        Ok(())
    }
}

/// Builds the ranking from the `sports-content-code` declarations of type
/// `team`. Rank is the encounter position, not a score. Every declaration is
/// checked against the directory and the first mismatch aborts the build.
pub fn build_ranking(doc: &Document, teams: &TeamDirectory) -> Result<RankingTable, CrawlError> {
    let mut table = RankingTable::default();

    for code in doc.descendants(SPORTS_CONTENT_CODE) {
        if code.attr(CODE_TYPE) != Some(TEAM) {
            continue;
        }
        let key = required_attr(code, CODE_KEY)?;
        let name = required_attr(code, CODE_NAME)?;
        let id = sportsml::parse_code_key(key)?;

        teams.verify_mapping(id, name)?;
        table.push(name.to_string())?;
    }

    tracing::debug!("Built ranking with {} teams", table.len());
    Ok(table)
}

fn required_attr<'a>(el: &'a Element, name: &str) -> Result<&'a str, CrawlError> {
    el.attr(name)
        .ok_or_else(|| CrawlError::MissingNode(format!("{}@{}", el.name(), name)))
}

/// Points and goal difference of a team in the current standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandingStats {
    pub points: i64,
    pub goal_difference: i64,
}

impl StandingStats {
    pub fn tokens(&self) -> [String; 2] {
        [self.points.to_string(), self.goal_difference.to_string()]
    }
}

/// Reads `team > team-stats > outcome-totals` for `team`.
pub fn standing_stats(doc: &Document, team: &str) -> Result<StandingStats, CrawlError> {
    let node = sportsml::find_team(doc, team)?;
    let totals = node
        .path(&[sportsml::TEAM_STATS, sportsml::OUTCOME_TOTALS])
        .ok_or_else(|| {
            CrawlError::MissingNode(format!(
                "{} > {} for '{}'",
                sportsml::TEAM_STATS,
                sportsml::OUTCOME_TOTALS,
                team
            ))
        })?;

    let points = sportsml::parse_i64(
        sportsml::STANDING_POINTS,
        required_attr(totals, sportsml::STANDING_POINTS)?,
    )?;
    let scored = sportsml::parse_i64(
        sportsml::POINTS_FOR,
        required_attr(totals, sportsml::POINTS_FOR)?,
    )?;
    let conceded = sportsml::parse_i64(
        sportsml::POINTS_AGAINST,
        required_attr(totals, sportsml::POINTS_AGAINST)?,
    )?;
    tracing::debug!("{}: points {}, goal difference {}", team, points, scored - conceded);

    Ok(StandingStats {
        points,
        goal_difference: scored - conceded,
    })
}
