use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid document store endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("tournament listing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed tournament listing: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("tournament source unavailable: {0}")]
    Unavailable(String),
}
