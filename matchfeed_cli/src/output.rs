use std::io::Write;

use anyhow::{bail, Result};
use matchfeed_lib::{FeatureRow, TeamEntry};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Space-separated model input, one match per line.
    Rows,
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_flag(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rows" => Ok(OutputFormat::Rows),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => bail!("Unknown output format '{}': use rows, table, json or csv", other),
        }
    }
}

#[derive(Tabled, Serialize)]
struct MatchSummaryRow {
    #[tabled(rename = "Round")]
    #[serde(rename = "Round")]
    round: u32,
    #[tabled(rename = "Team A")]
    #[serde(rename = "Team A")]
    team_a: String,
    #[tabled(rename = "Venue")]
    #[serde(rename = "Venue")]
    venue_a: String,
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank_a: u32,
    #[tabled(rename = "Pts")]
    #[serde(rename = "Pts")]
    points_a: i64,
    #[tabled(rename = "Form")]
    #[serde(rename = "Form")]
    form_a: String,
    #[tabled(rename = "Team B")]
    #[serde(rename = "Team B")]
    team_b: String,
    #[tabled(rename = "Rank B")]
    #[serde(rename = "Rank B")]
    rank_b: u32,
    #[tabled(rename = "Pts B")]
    #[serde(rename = "Pts B")]
    points_b: i64,
    #[tabled(rename = "Form B")]
    #[serde(rename = "Form B")]
    form_b: String,
}

#[derive(Tabled, Serialize)]
struct TeamRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Feed ID")]
    #[serde(rename = "Feed ID")]
    bundesliga_id: u32,
    #[tabled(rename = "Results Slug")]
    #[serde(rename = "Results Slug")]
    resultdb_slug: String,
    #[tabled(rename = "Results Name")]
    #[serde(rename = "Results Name")]
    resultdb_name: String,
}

fn build_match_rows(rows: &[FeatureRow]) -> Vec<MatchSummaryRow> {
    rows.iter()
        .map(|r| MatchSummaryRow {
            round: r.round,
            team_a: r.team_a.team.clone(),
            venue_a: r.team_a.venue.to_string(),
            rank_a: r.team_a.rank,
            points_a: r.team_a.standing.points,
            form_a: r.team_a.form.tokens().join("-"),
            team_b: r.team_b.team.clone(),
            rank_b: r.team_b.rank,
            points_b: r.team_b.standing.points,
            form_b: r.team_b.form.tokens().join("-"),
        })
        .collect()
}

fn build_team_rows(teams: &[TeamEntry]) -> Vec<TeamRow> {
    teams
        .iter()
        .map(|t| TeamRow {
            name: t.name.clone(),
            bundesliga_id: t.bundesliga_id,
            resultdb_slug: t.resultdb_slug.clone(),
            resultdb_name: t.resultdb_name.clone(),
        })
        .collect()
}

fn feature_rows_to_lines(rows: &[FeatureRow]) -> Vec<String> {
    rows.iter().map(|r| r.to_string()).collect()
}

/// One header line from [`FeatureRow::column_names`], then one record per match.
fn write_features_csv<W: Write>(writer: W, rows: &[FeatureRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(FeatureRow::column_names())?;
    for row in rows {
        wtr.write_record(row.tokens())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_feature_rows(rows: &[FeatureRow], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Rows => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in feature_rows_to_lines(rows) {
                writeln!(out, "{}", line)?;
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new(build_match_rows(rows));
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Csv => write_features_csv(std::io::stdout(), rows)?,
    }
    Ok(())
}

pub fn print_teams(teams: &[TeamEntry], format: &OutputFormat) -> Result<()> {
    let rows = build_team_rows(teams);
    match format {
        OutputFormat::Rows | OutputFormat::Table => {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
