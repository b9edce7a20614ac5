//! URL templates for the two feeds.

use matchfeed_api::Charset;

use crate::error::CrawlError;

pub const BUNDESLIGA_BASE_URL: &str = "http://www.bundesliga.com/";
pub const RESULTDB_BASE_URL: &str = "http://www.resultdb.com/";

const STANDINGS_PATH: &str = "data/feed/51/{year}/post_standing/post_standing_{round}.xml?cb=517837";
const TEAM_STATS_PATH: &str =
    "data/feed/51/{year}/team_stats_round/team_stats_round_{round}.xml?cb=544329";
const TEAM_RESULTS_PATH: &str = "germany/{slug}/{year}/";

/// Where to fetch each document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoints {
    bundesliga_base: String,
    resultdb_base: String,
    resultdb_charset: Charset,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self::with_base_urls(BUNDESLIGA_BASE_URL, RESULTDB_BASE_URL)
    }
}

impl FeedEndpoints {
    /// Custom base URLs, e.g. a mirror or a mock server.
    pub fn with_base_urls(bundesliga_base: &str, resultdb_base: &str) -> Self {
        Self {
            bundesliga_base: with_trailing_slash(bundesliga_base),
            resultdb_base: with_trailing_slash(resultdb_base),
            resultdb_charset: Charset::Utf8,
        }
    }

    pub fn with_resultdb_charset(mut self, charset: Charset) -> Self {
        self.resultdb_charset = charset;
        self
    }

    /// Reads `MATCHFEED_BUNDESLIGA_URL`, `MATCHFEED_RESULTDB_URL` and
    /// `MATCHFEED_RESULTDB_CHARSET`, keeping the defaults for unset variables.
    pub fn from_env() -> Result<Self, CrawlError> {
        let bundesliga = std::env::var("MATCHFEED_BUNDESLIGA_URL")
            .unwrap_or_else(|_| BUNDESLIGA_BASE_URL.to_string());
        let resultdb = std::env::var("MATCHFEED_RESULTDB_URL")
            .unwrap_or_else(|_| RESULTDB_BASE_URL.to_string());
        let mut endpoints = Self::with_base_urls(&bundesliga, &resultdb);

        if let Ok(label) = std::env::var("MATCHFEED_RESULTDB_CHARSET") {
            let charset = Charset::from_label(&label).ok_or_else(|| {
                CrawlError::InvalidInput(format!(
                    "unknown charset '{}'. Valid values: utf-8, iso-8859-9",
                    label
                ))
            })?;
            endpoints = endpoints.with_resultdb_charset(charset);
        }
        Ok(endpoints)
    }

    pub fn resultdb_charset(&self) -> Charset {
        self.resultdb_charset
    }

    /// Standings after `round` of the season starting in `year`.
    pub fn standings_url(&self, year: i32, round: u32) -> String {
        self.bundesliga_base.clone()
            + &STANDINGS_PATH
                .replace("{year}", &year.to_string())
                .replace("{round}", &round.to_string())
    }

    /// Per-team tracking stats of `round`.
    pub fn team_stats_url(&self, year: i32, round: u32) -> String {
        self.bundesliga_base.clone()
            + &TEAM_STATS_PATH
                .replace("{year}", &year.to_string())
                .replace("{round}", &round.to_string())
    }

    /// A team's season results page.
    pub fn team_results_url(&self, slug: &str, year: i32) -> String {
        self.resultdb_base.clone()
            + &TEAM_RESULTS_PATH
                .replace("{slug}", slug)
                .replace("{year}", &year.to_string())
    }
}

fn with_trailing_slash(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_urls() {
        let endpoints = FeedEndpoints::default();
        assert_eq!(
            endpoints.standings_url(2011, 2),
            "http://www.bundesliga.com/data/feed/51/2011/post_standing/post_standing_2.xml?cb=517837"
        );
        assert_eq!(
            endpoints.team_stats_url(2011, 1),
            "http://www.bundesliga.com/data/feed/51/2011/team_stats_round/team_stats_round_1.xml?cb=544329"
        );
        assert_eq!(
            endpoints.team_results_url("monchengladbach", 2011),
            "http://www.resultdb.com/germany/monchengladbach/2011/"
        );
        assert_eq!(endpoints.resultdb_charset(), Charset::Utf8);
    }

    #[test]
    fn test_custom_base_gets_trailing_slash() {
        let endpoints = FeedEndpoints::with_base_urls("http://127.0.0.1:8080", "http://127.0.0.1:8081/");
        assert_eq!(
            endpoints.team_results_url("koln", 2012),
            "http://127.0.0.1:8081/germany/koln/2012/"
        );
        assert!(endpoints
            .standings_url(2012, 5)
            .starts_with("http://127.0.0.1:8080/data/feed/51/2012/"));
    }

    #[test]
    fn test_charset_override() {
        let endpoints = FeedEndpoints::default().with_resultdb_charset(Charset::Iso8859_9);
        assert_eq!(endpoints.resultdb_charset(), Charset::Iso8859_9);
    }
}
