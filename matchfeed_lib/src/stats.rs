//! Per-team tracking stats from a round-stats document, with round averages
//! standing in for blank values.

use std::fmt;

use serde::Serialize;

use crate::document::{Document, Element};
use crate::error::CrawlError;
use crate::sportsml::{self, GROUP_STATS, STATS_FOUL, STATS_OFFENSIVE, TEAM_STATS, TEAM_STATS_SOCCER};

/// The five tracked statistics, in row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedStat {
    Distance,
    Sprints,
    Passes,
    Shots,
    Fouls,
}

impl TrackedStat {
    pub const ALL: [TrackedStat; 5] = [
        TrackedStat::Distance,
        TrackedStat::Sprints,
        TrackedStat::Passes,
        TrackedStat::Shots,
        TrackedStat::Fouls,
    ];

    /// Attribute carrying the stat in the feed.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Distance => "imp:tracking-distance",
            Self::Sprints => "imp:tracking-sprints",
            Self::Passes => "imp:passes-total",
            Self::Shots => "shots-total",
            Self::Fouls => "fouls-committed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Sprints => "sprints",
            Self::Passes => "passes",
            Self::Shots => "shots",
            Self::Fouls => "fouls",
        }
    }
}

/// League-wide averages for one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageRoundStats {
    pub distance: f64,
    pub sprints: f64,
    pub passes: f64,
    pub shots: f64,
    pub fouls: f64,
}

impl AverageRoundStats {
    /// Reads the tracked attributes of the first `group-stats` element.
    pub fn from_document(doc: &Document) -> Result<Self, CrawlError> {
        let group = doc
            .descendants(GROUP_STATS)
            .into_iter()
            .next()
            .ok_or_else(|| CrawlError::MissingNode(GROUP_STATS.to_string()))?;

        let read = |stat: TrackedStat| -> Result<f64, CrawlError> {
            let raw = group.attr(stat.attribute()).ok_or_else(|| {
                CrawlError::MissingNode(format!("{}@{}", GROUP_STATS, stat.attribute()))
            })?;
            raw.trim().parse::<f64>().map_err(|_| CrawlError::InvalidNumber {
                field: stat.attribute().to_string(),
                value: raw.to_string(),
            })
        };

        let averages = Self {
            distance: read(TrackedStat::Distance)?,
            sprints: read(TrackedStat::Sprints)?,
            passes: read(TrackedStat::Passes)?,
            shots: read(TrackedStat::Shots)?,
            fouls: read(TrackedStat::Fouls)?,
        };
        tracing::debug!("Round averages: {:?}", averages);
        Ok(averages)
    }

    pub fn get(&self, stat: TrackedStat) -> f64 {
        match stat {
            TrackedStat::Distance => self.distance,
            TrackedStat::Sprints => self.sprints,
            TrackedStat::Passes => self.passes,
            TrackedStat::Shots => self.shots,
            TrackedStat::Fouls => self.fouls,
        }
    }
}

/// A stat as it appears in the row: the crawled text verbatim, or the
/// truncated round average when the feed left it blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Raw(String),
    Average(i64),
}

impl StatValue {
    fn from_attr(raw: Option<&str>, average: f64) -> Self {
        match raw {
            Some(value) if !value.trim().is_empty() => Self::Raw(value.to_string()),
            _ => Self::Average(average.trunc() as i64),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(value) => f.write_str(value),
            Self::Average(value) => write!(f, "{value}"),
        }
    }
}

/// Previous-round performance of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamPerformance {
    pub distance: StatValue,
    pub sprints: StatValue,
    pub passes: StatValue,
    pub shots: StatValue,
    pub fouls: StatValue,
}

impl TeamPerformance {
    pub fn values(&self) -> [&StatValue; 5] {
        [
            &self.distance,
            &self.sprints,
            &self.passes,
            &self.shots,
            &self.fouls,
        ]
    }

    pub fn tokens(&self) -> Vec<String> {
        self.values().iter().map(|v| v.to_string()).collect()
    }
}

/// Extracts `team`'s tracked stats from a round-stats document.
///
/// Distance, sprints and passes live on `team-stats > team-stats-soccer`;
/// shots on its `stats-soccer-offensive` child and fouls on its
/// `stats-soccer-foul` child.
pub fn extract_team_stats(
    doc: &Document,
    team: &str,
    averages: &AverageRoundStats,
) -> Result<TeamPerformance, CrawlError> {
    let node = sportsml::find_team(doc, team)?;
    let soccer = required_path(node, &[TEAM_STATS, TEAM_STATS_SOCCER], team)?;
    let offensive = required_path(soccer, &[STATS_OFFENSIVE], team)?;
    let foul = required_path(soccer, &[STATS_FOUL], team)?;

    let value = |block: &Element, stat: TrackedStat| {
        StatValue::from_attr(block.attr(stat.attribute()), averages.get(stat))
    };

    Ok(TeamPerformance {
        distance: value(soccer, TrackedStat::Distance),
        sprints: value(soccer, TrackedStat::Sprints),
        passes: value(soccer, TrackedStat::Passes),
        shots: value(offensive, TrackedStat::Shots),
        fouls: value(foul, TrackedStat::Fouls),
    })
}

fn required_path<'a>(from: &'a Element, path: &[&str], team: &str) -> Result<&'a Element, CrawlError> {
    from.path(path)
        .ok_or_else(|| CrawlError::MissingNode(format!("{} for '{}'", path.join(" > "), team)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;

    const ROUND_STATS: &str = r#"<sports-content>
  <group-stats imp:tracking-distance="111923.72" imp:tracking-sprints="191.69"
               imp:passes-total="393.78" shots-total="12.54" fouls-committed="14.94"/>
  <team>
    <team-metadata team-key="15"><name full="1.FSV Mainz 05"/></team-metadata>
    <team-stats>
      <team-stats-soccer imp:tracking-distance="125042.44" imp:tracking-sprints="184" imp:passes-total="320">
        <stats-soccer-offensive shots-total="13"/>
        <stats-soccer-foul fouls-committed="11"/>
      </team-stats-soccer>
    </team-stats>
  </team>
  <team>
    <team-metadata team-key="14"><name full="FC Bayern München"/></team-metadata>
    <team-stats>
      <team-stats-soccer imp:tracking-distance="" imp:tracking-sprints="189" imp:passes-total="579">
        <stats-soccer-offensive shots-total="21"/>
        <stats-soccer-foul/>
      </team-stats-soccer>
    </team-stats>
  </team>
</sports-content>"#;

    fn doc() -> Document {
        Document::parse(ROUND_STATS, DocumentKind::Xml).unwrap()
    }

    #[test]
    fn test_averages_from_first_group_stats() {
        let averages = AverageRoundStats::from_document(&doc()).unwrap();
        assert_eq!(averages.distance, 111923.72);
        assert_eq!(averages.sprints, 191.69);
        assert_eq!(averages.passes, 393.78);
        assert_eq!(averages.shots, 12.54);
        assert_eq!(averages.fouls, 14.94);
    }

    #[test]
    fn test_averages_require_group_stats() {
        let d = Document::parse("<sports-content/>", DocumentKind::Xml).unwrap();
        assert!(matches!(
            AverageRoundStats::from_document(&d),
            Err(CrawlError::MissingNode(_))
        ));
    }

    #[test]
    fn test_raw_values_pass_through_verbatim() {
        let d = doc();
        let averages = AverageRoundStats::from_document(&d).unwrap();
        let perf = extract_team_stats(&d, "1.FSV Mainz 05", &averages).unwrap();
        assert_eq!(perf.tokens().join(" "), "125042.44 184 320 13 11");
    }

    #[test]
    fn test_blank_or_absent_values_use_truncated_average() {
        let d = doc();
        let averages = AverageRoundStats::from_document(&d).unwrap();
        let perf = extract_team_stats(&d, "FC Bayern München", &averages).unwrap();
        assert_eq!(perf.distance, StatValue::Average(111923));
        assert_eq!(perf.fouls, StatValue::Average(14));
        assert_eq!(perf.tokens().join(" "), "111923 189 579 21 14");
    }

    #[test]
    fn test_raw_value_keeps_surrounding_whitespace() {
        let d = Document::parse(
            r#"<r><team><team-metadata team-key="54"><name full="Hertha BSC"/></team-metadata>
<team-stats><team-stats-soccer imp:tracking-distance=" 109877.5" imp:tracking-sprints="  " imp:passes-total="301 ">
<stats-soccer-offensive shots-total="8"/><stats-soccer-foul fouls-committed="16"/>
</team-stats-soccer></team-stats></team></r>"#,
            DocumentKind::Xml,
        )
        .unwrap();
        let averages = AverageRoundStats::from_document(&doc()).unwrap();
        let perf = extract_team_stats(&d, "Hertha BSC", &averages).unwrap();
        assert_eq!(perf.distance, StatValue::Raw(" 109877.5".into()));
        assert_eq!(perf.sprints, StatValue::Average(191));
        assert_eq!(perf.passes, StatValue::Raw("301 ".into()));
    }

    #[test]
    fn test_unknown_team() {
        let d = doc();
        let averages = AverageRoundStats::from_document(&d).unwrap();
        assert!(matches!(
            extract_team_stats(&d, "Hertha BSC", &averages),
            Err(CrawlError::TeamNotFound(_))
        ));
    }

    #[test]
    fn test_missing_stats_block() {
        let d = Document::parse(
            r#"<r><team><team-metadata><name full="Hertha BSC"/></team-metadata><team-stats/></team></r>"#,
            DocumentKind::Xml,
        )
        .unwrap();
        let averages = AverageRoundStats {
            distance: 1.0,
            sprints: 1.0,
            passes: 1.0,
            shots: 1.0,
            fouls: 1.0,
        };
        assert!(matches!(
            extract_team_stats(&d, "Hertha BSC", &averages),
            Err(CrawlError::MissingNode(_))
        ));
    }

    #[test]
    fn test_stat_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            StatValue::Raw("12.5".into()),
            StatValue::Average(7),
        ])
        .unwrap();
        assert_eq!(json, r#"["12.5",7]"#);
    }
}
