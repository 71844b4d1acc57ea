//! Failure kinds seen inside the catalog layer.
//!
//! None of these reach gateway callers: they are logged and turned into cached
//! or empty results. They exist so the individual components can report what
//! went wrong in a structured way.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network is unreachable")]
    Offline,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Transport(err.to_string())
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
