use crate::error::CrawlError;

/// Matchdays in a Bundesliga season.
pub const ROUNDS: u32 = 34;
/// First round with a previous round to draw features from.
pub const MIN_ROUND: u32 = 2;

pub const MIN_YEAR: i32 = 1963;
pub const MAX_YEAR: i32 = 2100;

pub const MAX_TEAM_NAME_LENGTH: usize = 64;

/// Validate a season year (1963..=2100).
pub fn validate_year(year: i32) -> Result<i32, CrawlError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CrawlError::InvalidInput(format!(
            "year must be between {} and {}",
            MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(year)
}

/// Validate a round number. Round 1 has no previous round and is rejected.
pub fn validate_round(round: u32) -> Result<u32, CrawlError> {
    if !(MIN_ROUND..=ROUNDS).contains(&round) {
        return Err(CrawlError::InvalidInput(format!(
            "round must be between {} and {}",
            MIN_ROUND, ROUNDS
        )));
    }
    Ok(round)
}

/// Strip ASCII control characters, trim whitespace, and enforce a byte-length limit.
pub fn validate_team_name(input: &str) -> Result<String, CrawlError> {
    if input.len() > MAX_TEAM_NAME_LENGTH {
        return Err(CrawlError::InvalidInput(format!(
            "team name exceeds maximum length of {} bytes",
            MAX_TEAM_NAME_LENGTH
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(CrawlError::InvalidInput(
            "team name is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}
