use anyhow::Result;
use clap::Args;
use matchfeed_lib::validation;
use matchfeed_lib::MatchFeatureAssembler;

use crate::output::{print_feature_rows, OutputFormat};

#[derive(Args)]
pub struct MatchArgs {
    /// Home team, canonical name (see `matchfeed teams`)
    #[arg(long)]
    pub home: String,

    /// Away team, canonical name
    #[arg(long)]
    pub away: String,

    /// Year the season starts in (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Round number, 2 to 34
    #[arg(long)]
    pub round: u32,
}

pub async fn run(
    args: &MatchArgs,
    assembler: &MatchFeatureAssembler,
    format: &OutputFormat,
) -> Result<()> {
    let year = validation::validate_year(args.year.unwrap_or_else(super::current_year))?;
    let round = validation::validate_round(args.round)?;

    let cache = assembler.new_run_cache();
    let row = assembler
        .assemble_match(&args.home, &args.away, year, round, &cache)
        .await?;

    print_feature_rows(std::slice::from_ref(&row), format)
}
