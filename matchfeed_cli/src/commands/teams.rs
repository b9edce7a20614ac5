use anyhow::Result;
use matchfeed_lib::TeamDirectory;

use crate::output::{print_teams, OutputFormat};

pub fn run(teams: &TeamDirectory, format: &OutputFormat) -> Result<()> {
    eprintln!("{} teams", teams.len());
    print_teams(teams.teams(), format)
}
