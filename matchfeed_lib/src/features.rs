//! Feature rows handed to the prediction model.

use std::fmt;

use serde::Serialize;

use crate::ranking::StandingStats;
use crate::results::{FormRecord, Venue};
use crate::stats::{TeamPerformance, TrackedStat};

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamFeatures {
    pub team: String,
    pub rank: u32,
    pub standing: StandingStats,
    pub venue: Venue,
    pub performance: TeamPerformance,
    pub form: FormRecord,
}

impl TeamFeatures {
    /// `rank points goalDiff venue perf(5) form(5)`
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(TEAM_TOKENS);
        tokens.push(self.rank.to_string());
        tokens.extend(self.standing.tokens());
        tokens.push(self.venue.token().to_string());
        tokens.extend(self.performance.tokens());
        tokens.extend(self.form.tokens());
        tokens
    }
}

/// Tokens per team block.
pub const TEAM_TOKENS: usize = 14;
/// Tokens per row: round, two team blocks, empty head-to-head block.
pub const ROW_TOKENS: usize = 1 + 2 * TEAM_TOKENS;

/// Features for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRow {
    pub year: i32,
    pub round: u32,
    pub team_a: TeamFeatures,
    pub team_b: TeamFeatures,
    pub head_to_head: Vec<String>,
}

impl FeatureRow {
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(ROW_TOKENS + self.head_to_head.len());
        tokens.push(self.round.to_string());
        tokens.extend(self.team_a.tokens());
        tokens.extend(self.team_b.tokens());
        tokens.extend(self.head_to_head.iter().cloned());
        tokens
    }

    /// Column names matching [`FeatureRow::tokens`].
    pub fn column_names() -> Vec<String> {
        let mut names = vec!["round".to_string()];
        for side in ["a", "b"] {
            names.push(format!("{side}_rank"));
            names.push(format!("{side}_points"));
            names.push(format!("{side}_goal_difference"));
            names.push(format!("{side}_venue"));
            for stat in TrackedStat::ALL {
                names.push(format!("{side}_{}", stat.label()));
            }
            for bucket in ["huge_win", "huge_loss", "win", "loss", "tie"] {
                names.push(format!("{side}_{bucket}"));
            }
        }
        names
    }
}

impl fmt::Display for FeatureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}
