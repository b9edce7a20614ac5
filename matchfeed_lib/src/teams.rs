//! Team identity across the XML feed and the results site.
//!
//! The directory is built once from the embedded `seed_data/teams.toml`
//! (compile-time `include_str!`) and shared read-only by every stage.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::{CrawlError, TeamFeed};

/// Top-level structure of the team seed file.
#[derive(Deserialize, Debug)]
pub struct TeamSeedFile {
    #[serde(rename = "team")]
    pub teams: Vec<TeamEntry>,
}

/// One team as known to both feeds.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TeamEntry {
    /// Canonical name, as written in the XML feed.
    pub name: String,
    pub bundesliga_id: u32,
    pub resultdb_slug: String,
    pub resultdb_name: String,
}

/// Immutable lookup tables derived from the seed entries.
#[derive(Debug, Clone)]
pub struct TeamDirectory {
    entries: Vec<TeamEntry>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
    by_resultdb_name: HashMap<String, usize>,
}

impl TeamDirectory {
    /// Loads the embedded seed file.
    pub fn load() -> Result<Self, CrawlError> {
        let content = include_str!("../../seed_data/teams.toml");
        Self::from_toml(content)
    }

    /// Parses and validates a seed file. Ids, names, slugs and results-site
    /// names must each be unique.
    pub fn from_toml(content: &str) -> Result<Self, CrawlError> {
        let file: TeamSeedFile =
            toml::from_str(content).map_err(|e| CrawlError::Seed(e.to_string()))?;
        Self::from_entries(file.teams)
    }

    pub fn from_entries(entries: Vec<TeamEntry>) -> Result<Self, CrawlError> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_resultdb_name = HashMap::new();
        let mut slugs = HashSet::new();

        for (idx, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.bundesliga_id, idx).is_some() {
                return Err(CrawlError::Seed(format!(
                    "duplicate bundesliga id {}",
                    entry.bundesliga_id
                )));
            }
            if by_name.insert(entry.name.clone(), idx).is_some() {
                return Err(CrawlError::Seed(format!("duplicate team name '{}'", entry.name)));
            }
            if by_resultdb_name
                .insert(entry.resultdb_name.clone(), idx)
                .is_some()
            {
                return Err(CrawlError::Seed(format!(
                    "duplicate resultdb name '{}'",
                    entry.resultdb_name
                )));
            }
            if !slugs.insert(entry.resultdb_slug.as_str()) {
                return Err(CrawlError::Seed(format!(
                    "duplicate resultdb slug '{}'",
                    entry.resultdb_slug
                )));
            }
        }

        Ok(Self {
            entries,
            by_id,
            by_name,
            by_resultdb_name,
        })
    }

    pub fn teams(&self) -> &[TeamEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical name for a feed id.
    pub fn name_for_id(&self, id: u32) -> Result<&str, CrawlError> {
        self.by_id
            .get(&id)
            .map(|&idx| self.entries[idx].name.as_str())
            .ok_or_else(|| CrawlError::UnknownTeamMapping {
                feed: TeamFeed::Bundesliga,
                key: id.to_string(),
            })
    }

    /// Results-site slug for a canonical name.
    pub fn slug_for(&self, name: &str) -> Result<&str, CrawlError> {
        self.by_name
            .get(name)
            .map(|&idx| self.entries[idx].resultdb_slug.as_str())
            .ok_or_else(|| CrawlError::UnknownTeamMapping {
                feed: TeamFeed::Canonical,
                key: name.to_string(),
            })
    }

    /// Canonical name for a results-site display name.
    pub fn name_for_resultdb(&self, display: &str) -> Result<&str, CrawlError> {
        self.by_resultdb_name
            .get(display.trim())
            .map(|&idx| self.entries[idx].name.as_str())
            .ok_or_else(|| CrawlError::UnknownTeamMapping {
                feed: TeamFeed::ResultDb,
                key: display.to_string(),
            })
    }

    /// Checks that the feed's name for `id` agrees with the directory.
    pub fn verify_mapping(&self, id: u32, crawled_name: &str) -> Result<(), CrawlError> {
        let mapped = self.name_for_id(id)?;
        if mapped == crawled_name {
            return Ok(());
        }
        tracing::error!(
            "Team with id {} is named '{}' in the feed, but the directory maps id {} to '{}'",
            id,
            crawled_name,
            id,
            mapped
        );
        Err(CrawlError::IllegalTeamMapping {
            id,
            crawled: crawled_name.to_string(),
            mapped: mapped.to_string(),
        })
    }
}
