//! Opponent, venue and recent form from a team's ResultDB season page.
//!
//! The page lists one row per match with the most recent match first, so the
//! match of round `r` sits `r` rows from the end of the table.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::document::{Document, Element};
use crate::error::CrawlError;

const RESULTS_TABLE: &str = "table";
const RESULTS_CLASS: &str = "results";
const AWAY_LITERAL: &str = "Away";

const OPPONENT_CELL: usize = 1;
const VENUE_CELL: usize = 2;
const RESULT_CELL: usize = 3;
const SCORE_CELL: usize = 4;

/// Matches considered for recent form.
pub const FORM_WINDOW: u32 = 5;

/// Where a team plays a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn opposite(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Home => "1",
            Self::Away => "-1",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A team's opponent in one round, as the results site names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub opponent: String,
    pub venue: Venue,
}

/// Outcome counts over the last matches before a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormRecord {
    pub huge_win: u32,
    pub huge_loss: u32,
    pub win: u32,
    pub loss: u32,
    pub tie: u32,
}

impl FormRecord {
    /// Adds one match. A margin above one goal counts as huge.
    pub fn add_outcome(&mut self, code: &str, score: &str) -> Result<(), CrawlError> {
        let code = code.trim();
        if !matches!(code, "W" | "L" | "D") {
            return Err(CrawlError::InvalidResultCode(code.to_string()));
        }
        let (home, away) = parse_score(score)?;
        let margin = home.abs_diff(away);

        match (code, margin > 1) {
            ("D", _) => self.tie += 1,
            ("W", true) => self.huge_win += 1,
            ("W", false) => self.win += 1,
            ("L", true) => self.huge_loss += 1,
            _ => self.loss += 1,
        }
        Ok(())
    }

    pub fn total(&self) -> u32 {
        self.huge_win + self.huge_loss + self.win + self.loss + self.tie
    }

    /// `[hugeWin, hugeLoss, win, loss, tie]`
    pub fn counts(&self) -> [u32; 5] {
        [self.huge_win, self.huge_loss, self.win, self.loss, self.tie]
    }

    pub fn tokens(&self) -> Vec<String> {
        self.counts().iter().map(u32::to_string).collect()
    }
}

fn parse_score(score: &str) -> Result<(u32, u32), CrawlError> {
    let re = Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$")
        .map_err(|e| CrawlError::MalformedDocument(format!("score regex: {e}")))?;
    let caps = re
        .captures(score)
        .ok_or_else(|| CrawlError::InvalidScore(score.to_string()))?;
    let goals = |idx: usize| -> Result<u32, CrawlError> {
        caps.get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| CrawlError::InvalidScore(score.to_string()))
    };
    Ok((goals(1)?, goals(2)?))
}

/// The rows of the first `table.results` on a results page.
#[derive(Debug)]
pub struct ResultsTable<'a> {
    rows: Vec<&'a Element>,
}

impl<'a> ResultsTable<'a> {
    pub fn from_document(doc: &'a Document) -> Result<Self, CrawlError> {
        let table = doc
            .first_with_class(RESULTS_TABLE, RESULTS_CLASS)
            .ok_or_else(|| CrawlError::MissingNode(format!("{RESULTS_TABLE}.{RESULTS_CLASS}")))?;

        let body = table.child("tbody").unwrap_or(table);
        let rows: Vec<&Element> = body.children_named("tr").collect();
        tracing::debug!("Results table has {} rows", rows.len());
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Opponent and venue for `round`, from the row `round` positions from the end.
    pub fn opponent_and_venue(&self, round: u32) -> Result<Fixture, CrawlError> {
        let row = self.row(self.round_index(round)?)?;
        let cells = cells(row, VENUE_CELL + 1)?;

        let venue = if cells[VENUE_CELL].text() == AWAY_LITERAL {
            Venue::Away
        } else {
            Venue::Home
        };
        Ok(Fixture {
            opponent: cells[OPPONENT_CELL].text(),
            venue,
        })
    }

    /// Form over the last `min(round - 1, 5)` matches before `round`.
    pub fn extract_form(&self, round: u32) -> Result<FormRecord, CrawlError> {
        let start = self.round_index(round)? + 1;
        let lookback = round.saturating_sub(1).min(FORM_WINDOW) as usize;

        let mut form = FormRecord::default();
        for i in 0..lookback {
            let row = self.row(start + i)?;
            let cells = cells(row, SCORE_CELL + 1)?;
            form.add_outcome(&cells[RESULT_CELL].text(), &cells[SCORE_CELL].text())?;
        }
        Ok(form)
    }

    fn round_index(&self, round: u32) -> Result<usize, CrawlError> {
        let rows = self.rows.len();
        let round_usize = round as usize;
        if round == 0 || round_usize > rows {
            return Err(CrawlError::RoundOutOfRange { round, rows });
        }
        Ok(rows - round_usize)
    }

    fn row(&self, idx: usize) -> Result<&'a Element, CrawlError> {
        self.rows
            .get(idx)
            .copied()
            .ok_or_else(|| CrawlError::RoundOutOfRange {
                round: self.rows.len().saturating_sub(idx) as u32,
                rows: self.rows.len(),
            })
    }
}

fn cells(row: &Element, needed: usize) -> Result<Vec<&Element>, CrawlError> {
    let cells: Vec<&Element> = row
        .elements()
        .filter(|el| el.name() == "td" || el.name() == "th")
        .collect();
    if cells.len() < needed {
        return Err(CrawlError::MalformedDocument(format!(
            "results row has {} cells, expected at least {}",
            cells.len(),
            needed
        )));
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;

    fn page(rows: &[(&str, &str, &str, &str)]) -> Document {
        let body: String = rows
            .iter()
            .map(|(opp, venue, code, score)| {
                format!("<tr><td>date</td><td>{opp}</td><td>{venue}</td><td>{code}</td><td>{score}</td></tr>")
            })
            .collect();
        let html = format!("<html><body><table class=\"results\">{body}</table></body></html>");
        Document::parse(&html, DocumentKind::Html).unwrap()
    }

    #[test]
    fn test_classification() {
        let mut form = FormRecord::default();
        form.add_outcome("W", "1-0").unwrap();
        assert_eq!(form.win, 1);
        form.add_outcome("D", "1-1").unwrap();
        assert_eq!(form.tie, 1);
        form.add_outcome("W", "3-0").unwrap();
        form.add_outcome("W", "0-3").unwrap();
        assert_eq!(form.huge_win, 2);
        form.add_outcome("L", "2-4").unwrap();
        form.add_outcome("L", "1-2").unwrap();
        assert_eq!(form.counts(), [2, 1, 1, 1, 1]);
        assert_eq!(form.total(), 6);
    }

    #[test]
    fn test_invalid_code_and_score() {
        let mut form = FormRecord::default();
        assert!(matches!(
            form.add_outcome("X", "1-0"),
            Err(CrawlError::InvalidResultCode(ref c)) if c == "X"
        ));
        assert!(matches!(
            form.add_outcome("W", "1:0"),
            Err(CrawlError::InvalidScore(_))
        ));
        assert!(matches!(
            form.add_outcome("W", "-"),
            Err(CrawlError::InvalidScore(_))
        ));
        assert_eq!(form.total(), 0);
    }

    #[test]
    fn test_score_with_spaces() {
        let mut form = FormRecord::default();
        form.add_outcome("L", " 0 - 2 ").unwrap();
        assert_eq!(form.huge_loss, 1);
    }

    #[test]
    fn test_opponent_and_venue() {
        // newest first: round 3, round 2, round 1
        let doc = page(&[
            ("Köln", "Home", "D", "0-0"),
            ("Hamburg", "Away", "L", "0-1"),
            ("Freiburg", "Home", "W", "3-0"),
        ]);
        let table = ResultsTable::from_document(&doc).unwrap();
        assert_eq!(table.len(), 3);

        let second = table.opponent_and_venue(2).unwrap();
        assert_eq!(second.opponent, "Hamburg");
        assert_eq!(second.venue, Venue::Away);
        assert_eq!(table.opponent_and_venue(3).unwrap().venue, Venue::Home);
    }

    #[test]
    fn test_form_uses_rows_before_round() {
        let doc = page(&[
            ("Köln", "Home", "D", "0-0"),
            ("Hamburg", "Away", "L", "0-1"),
            ("Freiburg", "Home", "W", "3-0"),
        ]);
        let table = ResultsTable::from_document(&doc).unwrap();
        assert_eq!(table.extract_form(3).unwrap().counts(), [1, 0, 0, 1, 0]);
        assert_eq!(table.extract_form(2).unwrap().counts(), [1, 0, 0, 0, 0]);
        assert_eq!(table.extract_form(1).unwrap().total(), 0);
    }

    #[test]
    fn test_round_out_of_range() {
        let doc = page(&[("Köln", "Home", "D", "0-0")]);
        let table = ResultsTable::from_document(&doc).unwrap();
        assert!(matches!(
            table.opponent_and_venue(2),
            Err(CrawlError::RoundOutOfRange { round: 2, rows: 1 })
        ));
        assert!(matches!(
            table.extract_form(0),
            Err(CrawlError::RoundOutOfRange { .. })
        ));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let html = r#"<table class="results"><tr><td>a</td><td>Köln</td></tr><tr><td>b</td></tr></table>"#;
        let doc = Document::parse(html, DocumentKind::Html).unwrap();
        let table = ResultsTable::from_document(&doc).unwrap();
        assert!(matches!(
            table.opponent_and_venue(1),
            Err(CrawlError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_missing_table() {
        let doc = Document::parse("<p>no table</p>", DocumentKind::Html).unwrap();
        assert!(matches!(
            ResultsTable::from_document(&doc),
            Err(CrawlError::MissingNode(_))
        ));
    }

    #[test]
    fn test_venue_tokens() {
        assert_eq!(Venue::Home.to_string(), "1");
        assert_eq!(Venue::Away.to_string(), "-1");
        assert_eq!(Venue::Away.opposite(), Venue::Home);
    }
}
