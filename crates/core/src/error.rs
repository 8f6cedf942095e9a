use reqwest::StatusCode;
use std::path::PathBuf;

/// Fatal errors of a report run. Ticket cache failures are not here; they
/// degrade to a cache miss (see `storage::ticket_cache::CacheError`).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("{context}")]
    Network {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("received empty response from transaction endpoint")]
    EmptyResponse,

    #[error("transaction response is not valid JSON")]
    Decode(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
