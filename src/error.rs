//! Connector error taxonomy
//!
//! Every variant is per-venue and per-request: the scan core degrades a
//! failed fetch to "exclude this venue for this symbol/cycle" and the
//! cycle always completes. Insufficient liquidity is not an error; the
//! price model reports it as `None`.

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("venue error: {0}")]
    Venue(String),
}
