use anyhow::Result;
use clap::Args;
use matchfeed_lib::validation;
use matchfeed_lib::MatchFeatureAssembler;

use crate::output::{print_feature_rows, OutputFormat};

#[derive(Args)]
pub struct SeasonArgs {
    /// Year the season starts in (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

pub async fn run(
    args: &SeasonArgs,
    assembler: &MatchFeatureAssembler,
    format: &OutputFormat,
) -> Result<()> {
    let year = validation::validate_year(args.year.unwrap_or_else(super::current_year))?;

    let rows = assembler.assemble_season(year).await?;
    eprintln!("{} matches for season {}", rows.len(), year);

    print_feature_rows(&rows, format)
}
