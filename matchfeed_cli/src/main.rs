mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use matchfeed_lib::{
    FeedEndpoints, FetchConfig, MatchFeatureAssembler, RateLimitedFetcher, TeamDirectory,
};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "matchfeed")]
#[command(about = "Build Bundesliga match feature rows from the league feeds")]
struct Cli {
    /// Output format: rows, table, json or csv
    #[arg(long, default_value = "rows", global = true)]
    output: String,

    /// Fetch and parse every page again instead of reusing it within the run
    #[arg(long, global = true)]
    no_cache: bool,

    /// Minimum pause before each request, in seconds
    #[arg(long, global = true)]
    min_delay_secs: Option<f64>,

    /// Maximum pause before each request, in seconds
    #[arg(long, global = true)]
    max_delay_secs: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feature rows for every round of a season
    Season(commands::season::SeasonArgs),
    /// Feature rows for one round
    Round(commands::round::RoundArgs),
    /// Feature row for one named match
    #[command(name = "match")]
    Match(commands::matchup::MatchArgs),
    /// List the known teams and their identifiers in both feeds
    Teams,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("matchfeed=info".parse()?)
                .add_directive("matchfeed_lib=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(&cli.output)?;
    let teams = Arc::new(TeamDirectory::load()?);

    match &cli.command {
        Commands::Teams => commands::teams::run(&teams, &format)?,
        Commands::Season(args) => {
            let assembler = build_assembler(&cli, teams)?;
            commands::season::run(args, &assembler, &format).await?
        }
        Commands::Round(args) => {
            let assembler = build_assembler(&cli, teams)?;
            commands::round::run(args, &assembler, &format).await?
        }
        Commands::Match(args) => {
            let assembler = build_assembler(&cli, teams)?;
            commands::matchup::run(args, &assembler, &format).await?
        }
    }

    Ok(())
}

fn build_assembler(cli: &Cli, teams: Arc<TeamDirectory>) -> Result<MatchFeatureAssembler> {
    let env = FetchConfig::from_env();
    let config = FetchConfig::from_secs(
        cli.min_delay_secs
            .unwrap_or_else(|| env.min_delay.as_secs_f64()),
        cli.max_delay_secs
            .unwrap_or_else(|| env.max_delay.as_secs_f64()),
    );
    tracing::debug!(
        "Request delay {:.1}s to {:.1}s",
        config.min_delay.as_secs_f64(),
        config.max_delay.as_secs_f64()
    );

    let fetcher = RateLimitedFetcher::new(config)?;
    let endpoints = FeedEndpoints::from_env()?;
    let assembler = MatchFeatureAssembler::new(fetcher, endpoints, teams);

    Ok(if cli.no_cache {
        assembler.without_cache()
    } else {
        assembler
    })
}
