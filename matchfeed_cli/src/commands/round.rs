use anyhow::Result;
use clap::Args;
use matchfeed_lib::validation;
use matchfeed_lib::MatchFeatureAssembler;

use crate::output::{print_feature_rows, OutputFormat};

#[derive(Args)]
pub struct RoundArgs {
    /// Year the season starts in (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Round number, 2 to 34
    #[arg(long)]
    pub round: u32,
}

pub async fn run(
    args: &RoundArgs,
    assembler: &MatchFeatureAssembler,
    format: &OutputFormat,
) -> Result<()> {
    let year = validation::validate_year(args.year.unwrap_or_else(super::current_year))?;
    let round = validation::validate_round(args.round)?;

    let cache = assembler.new_run_cache();
    let rows = assembler.assemble_round(year, round, &cache).await?;
    eprintln!("{} matches for season {} round {}", rows.len(), year, round);

    print_feature_rows(&rows, format)
}
