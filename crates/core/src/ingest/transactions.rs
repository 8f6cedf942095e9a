use crate::config::Settings;
use crate::domain::ticket::Ticket;
use crate::error::{Error, Result};
use crate::time::tr_market::DateRange;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Serialize;

/// Returns the raw transaction-history body for a date range.
#[async_trait::async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(&self, ticket: &Ticket, range: &DateRange) -> Result<String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionHistoryRequest {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Clone)]
pub struct EpiasClient {
    http: reqwest::Client,
    url: String,
}

impl EpiasClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn from_settings(http: reqwest::Client, settings: &Settings) -> Self {
        Self::new(http, settings.transactions_url.clone())
    }

    fn headers(ticket: &Ticket) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "tgt",
            HeaderValue::from_str(&ticket.token)
                .map_err(|_| Error::Auth("ticket is not a valid header value".to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl TransactionSource for EpiasClient {
    async fn fetch_transactions(&self, ticket: &Ticket, range: &DateRange) -> Result<String> {
        let req = TransactionHistoryRequest {
            start_date: range.start_param(),
            end_date: range.end_param(),
        };

        let res = self
            .http
            .post(&self.url)
            .headers(Self::headers(ticket)?)
            .json(&req)
            .send()
            .await
            .map_err(|source| Error::Network {
                context: "transaction history request failed",
                source,
            })?;

        let status = res.status();
        tracing::info!(http_status = %status, start = %req.start_date, end = %req.end_date, "EPİAŞ response");

        let text = res.text().await.map_err(|source| Error::Network {
            context: "failed to read transaction history response",
            source,
        })?;

        if !status.is_success() {
            return Err(Error::Http { status, body: text });
        }
        Ok(text)
    }
}

/// Fetches the raw body and rejects an empty one. Decoding is left to the caller
/// (`domain::transaction::parse_transactions`) so the raw body can be saved first.
pub async fn fetch_raw<S: TransactionSource + ?Sized>(
    source: &S,
    ticket: &Ticket,
    range: &DateRange,
) -> Result<String> {
    tracing::info!(start = %range.start_param(), end = %range.end_param(), "fetching transaction history");

    let raw = source.fetch_transactions(ticket, range).await?;
    if raw.trim().is_empty() {
        return Err(Error::EmptyResponse);
    }

    tracing::info!(bytes = raw.len(), "fetched transaction history");
    Ok(raw)
}
