//! HTTP client for the league data feeds.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::{user_agent::USER_AGENT, Error};

/// Character encoding used to decode a page body when the server does not
/// declare one in its `Content-Type` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Charset {
    #[default]
    Utf8,
    Iso8859_9,
}

impl Charset {
    /// The WHATWG encoding label understood by the body decoder.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Iso8859_9 => "iso-8859-9",
        }
    }

    /// Parses an encoding label, accepting the common spellings.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "iso-8859-9" | "iso8859-9" | "latin5" => Some(Self::Iso8859_9),
            _ => None,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Plain page fetcher. One GET per call, no caching and no pacing; the
/// library layer adds both.
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with the fixed browser user agent and a 30-second timeout.
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed {
                    url: String::new(),
                }
            })?;
        Ok(Self { http })
    }

    /// Fetches `url` and returns its body decoded with `charset`.
    ///
    /// Fails when the URL is malformed, the request cannot be completed, the
    /// status is not a success, or the body is blank.
    pub async fn get_text(&self, url: &str, charset: Charset) -> Result<String, Error> {
        let parsed = Url::parse(url).map_err(|e| {
            tracing::error!("Invalid URL '{}': {}", url, e);
            Error::InvalidUrl {
                url: url.to_string(),
            }
        })?;

        tracing::debug!("Sending 'GET' request to URL : {}", parsed);
        let resp = self
            .http
            .get(parsed)
            .header("accept", "text/html,application/xhtml+xml,application/xml")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get '{}': {}", url, e);
                Error::RequestFailed {
                    url: url.to_string(),
                }
            })?;

        let status = resp.status();
        let body = resp.text_with_charset(charset.label()).await.map_err(|e| {
            tracing::error!("Failed to read response body of '{}': {}", url, e);
            Error::RequestFailed {
                url: url.to_string(),
            }
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request to '{}' failed with status {}: {}", url, status, snippet);
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: snippet,
            });
        }

        if body.trim().is_empty() {
            return Err(Error::EmptyBody {
                url: url.to_string(),
            });
        }

        tracing::debug!("Successfully crawled url - '{}'", url);
        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
