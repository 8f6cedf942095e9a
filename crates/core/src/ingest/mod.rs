use crate::error::{Error, Result};

pub mod auth;
pub mod transactions;

/// Shared client for both endpoints. No request timeout is set; calls run to completion.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|source| Error::Network {
            context: "failed to build http client",
            source,
        })
}
