//! HTTP clients for upstream data sources

pub mod sleeper;

pub use sleeper::SleeperClient;

use thiserror::Error;

/// Failure fetching from an upstream API
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("upstream returned {status} for {endpoint}: {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type FetchResult<T> = Result<T, FetchError>;
