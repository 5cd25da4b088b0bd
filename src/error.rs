use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling or dispatching a Bot API call.
///
/// A non-2xx answer from Telegram is *not* an error: it comes back as a
/// normal `reqwest::Response` and the caller has to inspect the status.
#[derive(Debug, Error)]
pub enum Error {
    /// DNS, connect, TLS, reset or timeout failure.
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A detected local file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reported by the first request made through a client built with a
    /// proxy URL the HTTP client could not use.
    #[error("invalid proxy URL: {0}")]
    Proxy(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid request options: {0}")]
    Options(String),

    #[error("failed to encode request options: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
