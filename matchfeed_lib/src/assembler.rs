//! Round loop: pairs teams into matches and assembles one feature row per match.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use matchfeed_api::Charset;

use crate::cache::CrawlCache;
use crate::document::{parse_document, Document, DocumentKind};
use crate::endpoints::FeedEndpoints;
use crate::error::CrawlError;
use crate::features::{FeatureRow, TeamFeatures};
use crate::fetcher::RateLimitedFetcher;
use crate::ranking::{build_ranking, standing_stats, RankingTable};
use crate::results::{Fixture, ResultsTable, Venue};
use crate::sportsml;
use crate::stats::{extract_team_stats, AverageRoundStats};
use crate::teams::TeamDirectory;
use crate::validation::{self, MIN_ROUND, ROUNDS};

/// Everything a round needs that does not depend on the team.
struct RoundContext {
    year: i32,
    round: u32,
    standings: Arc<Document>,
    previous_standings: Arc<Document>,
    ranking: RankingTable,
    previous_stats: Arc<Document>,
    averages: AverageRoundStats,
}

pub struct MatchFeatureAssembler {
    fetcher: RateLimitedFetcher,
    endpoints: FeedEndpoints,
    teams: Arc<TeamDirectory>,
    caching: bool,
}

impl MatchFeatureAssembler {
    pub fn new(fetcher: RateLimitedFetcher, endpoints: FeedEndpoints, teams: Arc<TeamDirectory>) -> Self {
        Self {
            fetcher,
            endpoints,
            teams,
            caching: true,
        }
    }

    /// Every fetch goes to the network and every payload is parsed again.
    pub fn without_cache(mut self) -> Self {
        self.caching = false;
        self
    }

    pub fn teams(&self) -> &TeamDirectory {
        &self.teams
    }

    /// Caches for one run. Never reuse them across runs.
    pub fn new_run_cache(&self) -> CrawlCache {
        if self.caching {
            CrawlCache::in_memory()
        } else {
            CrawlCache::disabled()
        }
    }

    /// Rows for every round from 2 to 34. A failing round is logged and skipped.
    pub async fn assemble_season(&self, year: i32) -> Result<Vec<FeatureRow>, CrawlError> {
        validation::validate_year(year)?;
        tracing::info!("Start collecting data for year {}", year);

        let cache = self.new_run_cache();
        let mut rows = Vec::new();
        for round in MIN_ROUND..=ROUNDS {
            match self.assemble_round(year, round, &cache).await {
                Ok(round_rows) => {
                    tracing::info!(
                        "Created data for {} matches for year {} round {}",
                        round_rows.len(),
                        year,
                        round
                    );
                    rows.extend(round_rows);
                }
                Err(e) => {
                    tracing::error!("Failed to create data for year {} round {}: {}", year, round, e);
                }
            }
        }

        tracing::info!("Created {} data entries for year {}", rows.len(), year);
        Ok(rows)
    }

    /// One row per match of `round`.
    ///
    /// Team mapping failures abort the round. Other failures while handling a
    /// single team or match skip that team or match.
    pub async fn assemble_round(
        &self,
        year: i32,
        round: u32,
        cache: &CrawlCache,
    ) -> Result<Vec<FeatureRow>, CrawlError> {
        validation::validate_year(year)?;
        validation::validate_round(round)?;

        let ctx = self.round_context(year, round, cache).await?;
        let mut paired: HashSet<String> = HashSet::new();
        let mut rows = Vec::new();

        for node in sportsml::team_nodes(&ctx.standings) {
            let Some(id) = skip_recoverable(sportsml::team_id(node), "team node")? else {
                continue;
            };
            let team = self.teams.name_for_id(id)?.to_string();
            if paired.contains(&team) {
                continue;
            }

            let Some(fixture) = skip_recoverable(self.fixture_for(&team, &ctx, cache).await, &team)?
            else {
                continue;
            };
            let opponent = self.teams.name_for_resultdb(&fixture.opponent)?.to_string();
            if paired.contains(&opponent) {
                continue;
            }
            paired.insert(team.clone());
            paired.insert(opponent.clone());

            let row = self
                .build_row(&ctx, &team, fixture.venue, &opponent, cache)
                .await;
            if let Some(row) = skip_recoverable(row, format!("{team} - {opponent}"))? {
                tracing::debug!("Row: {}", row);
                rows.push(row);
            }
        }

        Ok(rows)
    }

    /// The row for one named pairing. `home` gets venue 1, `away` gets -1.
    pub async fn assemble_match(
        &self,
        home: &str,
        away: &str,
        year: i32,
        round: u32,
        cache: &CrawlCache,
    ) -> Result<FeatureRow, CrawlError> {
        validation::validate_year(year)?;
        validation::validate_round(round)?;
        let home = validation::validate_team_name(home)?;
        let away = validation::validate_team_name(away)?;
        if home == away {
            return Err(CrawlError::InvalidInput(format!(
                "'{home}' cannot play against itself"
            )));
        }
        self.teams.slug_for(&home)?;
        self.teams.slug_for(&away)?;

        let ctx = self.round_context(year, round, cache).await?;
        self.build_row(&ctx, &home, Venue::Home, &away, cache).await
    }

    async fn round_context(
        &self,
        year: i32,
        round: u32,
        cache: &CrawlCache,
    ) -> Result<RoundContext, CrawlError> {
        tracing::info!("Collecting round data for year {} round {}", year, round);

        let previous = round - 1;
        let previous_standings = self
            .feed_document(&self.endpoints.standings_url(year, previous), cache)
            .await?;
        let standings = self
            .feed_document(&self.endpoints.standings_url(year, round), cache)
            .await?;
        let ranking = build_ranking(&standings, &self.teams)?;

        let previous_stats = self
            .feed_document(&self.endpoints.team_stats_url(year, previous), cache)
            .await?;
        let averages = AverageRoundStats::from_document(&previous_stats)?;

        Ok(RoundContext {
            year,
            round,
            standings,
            previous_standings,
            ranking,
            previous_stats,
            averages,
        })
    }

    async fn feed_document(&self, url: &str, cache: &CrawlCache) -> Result<Arc<Document>, CrawlError> {
        let content = self.fetcher.fetch(url, Charset::Utf8, cache.pages()).await?;
        parse_document(&content, DocumentKind::Xml, cache.documents())
    }

    async fn results_page(
        &self,
        team: &str,
        year: i32,
        cache: &CrawlCache,
    ) -> Result<Arc<Document>, CrawlError> {
        let url = self.endpoints.team_results_url(self.teams.slug_for(team)?, year);
        let content = self
            .fetcher
            .fetch(&url, self.endpoints.resultdb_charset(), cache.pages())
            .await?;
        parse_document(&content, DocumentKind::Html, cache.documents())
    }

    async fn fixture_for(
        &self,
        team: &str,
        ctx: &RoundContext,
        cache: &CrawlCache,
    ) -> Result<Fixture, CrawlError> {
        let page = self.results_page(team, ctx.year, cache).await?;
        let table = ResultsTable::from_document(&page)?;
        table.opponent_and_venue(ctx.round)
    }

    async fn build_row(
        &self,
        ctx: &RoundContext,
        team: &str,
        venue: Venue,
        opponent: &str,
        cache: &CrawlCache,
    ) -> Result<FeatureRow, CrawlError> {
        let team_a = self.team_features(ctx, team, venue, cache).await?;
        let team_b = self
            .team_features(ctx, opponent, venue.opposite(), cache)
            .await?;

        Ok(FeatureRow {
            year: ctx.year,
            round: ctx.round,
            team_a,
            team_b,
            head_to_head: head_to_head(&ctx.previous_standings, team, opponent),
        })
    }

    async fn team_features(
        &self,
        ctx: &RoundContext,
        team: &str,
        venue: Venue,
        cache: &CrawlCache,
    ) -> Result<TeamFeatures, CrawlError> {
        let rank = ctx
            .ranking
            .rank_of(team)
            .ok_or_else(|| CrawlError::TeamNotFound(team.to_string()))?;
        let standing = standing_stats(&ctx.standings, team)?;
        let performance = extract_team_stats(&ctx.previous_stats, team, &ctx.averages)?;

        let page = self.results_page(team, ctx.year, cache).await?;
        let form = ResultsTable::from_document(&page)?.extract_form(ctx.round)?;

        Ok(TeamFeatures {
            team: team.to_string(),
            rank,
            standing,
            venue,
            performance,
            form,
        })
    }
}

/// Earlier meetings of the two teams. Standings carry no fixture history,
/// so the block is always empty.
fn head_to_head(_previous_standings: &Document, _team: &str, _opponent: &str) -> Vec<String> {
    Vec::new()
}

/// `Ok(None)` for a recoverable failure, which is logged; integrity
/// failures are returned.
fn skip_recoverable<T>(result: Result<T, CrawlError>, what: impl Display) -> Result<Option<T>, CrawlError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_integrity_violation() => Err(e),
        Err(e) => {
            tracing::warn!("Skipping {}: {}", what, e);
            Ok(None)
        }
    }
}
