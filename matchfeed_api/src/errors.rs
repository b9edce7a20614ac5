//! Error types for the HTTP transport.

/// Errors that can occur when fetching a page.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The URL could not be parsed.
    #[error("invalid url '{url}'")]
    InvalidUrl { url: String },
    /// The request failed (connection refused, timeout, unreadable body).
    #[error("request to '{url}' failed")]
    RequestFailed { url: String },
    /// The server answered with a non-success status.
    #[error("request to '{url}' failed with status {status}")]
    HttpStatus { url: String, status: u16, body: String },
    /// The body was empty or whitespace only.
    #[error("content of the page '{url}' is empty")]
    EmptyBody { url: String },
}
