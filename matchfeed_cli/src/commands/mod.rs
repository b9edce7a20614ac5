//! CLI subcommand implementations.

pub mod matchup;
pub mod round;
pub mod season;
pub mod teams;

use chrono::Datelike;

/// Season used when `--year` is omitted.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}
