use thiserror::Error;

/// Failure of a single request against the World Bank API.
///
/// Every variant is recoverable at the call site: the resolver falls back to the
/// input names and the fetcher skips the country.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("request failed with HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("decode json: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Shape(String),
}
