use crate::config::{Credentials, Settings};
use crate::domain::ticket::Ticket;
use crate::error::{Error, Result};
use crate::storage::ticket_cache::TicketCache;
use chrono::Utc;

const TICKET_MARKER: &str = "/cas/v1/tickets/";

/// Exchanges credentials for a raw identity response body.
#[async_trait::async_trait]
pub trait TicketIssuer: Send + Sync {
    async fn request_ticket(&self, username: &str, password: &str) -> Result<String>;
}

/// CAS ticket-granting endpoint.
#[derive(Debug, Clone)]
pub struct CasTicketIssuer {
    http: reqwest::Client,
    url: String,
}

impl CasTicketIssuer {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn from_settings(http: reqwest::Client, settings: &Settings) -> Self {
        Self::new(http, settings.tgt_url.clone())
    }
}

#[async_trait::async_trait]
impl TicketIssuer for CasTicketIssuer {
    async fn request_ticket(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .http
            .post(&self.url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|source| Error::Network {
                context: "ticket request failed",
                source,
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|source| Error::Network {
            context: "failed to read ticket response",
            source,
        })?;

        if !status.is_success() {
            return Err(Error::Http { status, body: text });
        }
        Ok(text)
    }
}

/// Pulls the ticket token out of `.../cas/v1/tickets/<TOKEN>"`.
pub fn extract_ticket(body: &str) -> Option<&str> {
    let start = body.find(TICKET_MARKER)? + TICKET_MARKER.len();
    let rest = &body[start..];
    let end = rest.find('"')?;
    let token = &rest[..end];
    (!token.is_empty()).then_some(token)
}

pub struct Authenticator<I> {
    cache: TicketCache,
    issuer: I,
}

impl<I: TicketIssuer> Authenticator<I> {
    pub fn new(cache: TicketCache, issuer: I) -> Self {
        Self { cache, issuer }
    }

    pub async fn get_ticket(&self, credentials: &Credentials) -> Result<Ticket> {
        if let Some(ticket) = self.cache.load() {
            tracing::info!(created_at = %ticket.created_at, "using cached ticket");
            return Ok(ticket);
        }

        let body = self
            .issuer
            .request_ticket(&credentials.username, &credentials.password)
            .await?;

        let token = extract_ticket(&body)
            .ok_or_else(|| Error::Auth("unparseable ticket response".to_string()))?;
        let ticket = Ticket::new(token, Utc::now());

        // Best-effort: a ticket we could not cache is still a valid ticket.
        match self.cache.save(&ticket) {
            Ok(()) => tracing::info!(path = %self.cache.path().display(), "cached new ticket"),
            Err(err) => tracing::warn!(error = %err, "failed to cache ticket"),
        }

        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CAS_BODY: &str = r#"<!DOCTYPE html><html><body><h1>TGT Created</h1><form action="https://giris.epias.com.tr/cas/v1/tickets/TGT-123-abcDEF-cas01" method="POST"></form></body></html>"#;

    #[derive(Clone)]
    struct FakeIssuer {
        body: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl FakeIssuer {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait::async_trait]
    impl TicketIssuer for FakeIssuer {
        async fn request_ticket(&self, _username: &str, _password: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.to_string())
        }
    }

    fn creds() -> Credentials {
        Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn extracts_token_between_marker_and_quote() {
        assert_eq!(extract_ticket(CAS_BODY), Some("TGT-123-abcDEF-cas01"));
    }

    #[test]
    fn extract_rejects_missing_marker_or_terminator() {
        assert_eq!(extract_ticket("<html>bad credentials</html>"), None);
        assert_eq!(extract_ticket("/cas/v1/tickets/TGT-1"), None);
        assert_eq!(extract_ticket(r#"/cas/v1/tickets/""#), None);
    }

    #[tokio::test]
    async fn cache_hit_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TicketCache::in_dir(dir.path());
        cache.save(&Ticket::new("TGT-cached", Utc::now())).unwrap();

        let issuer = FakeIssuer::new(CAS_BODY);
        let calls = issuer.calls.clone();
        let auth = Authenticator::new(cache, issuer);

        let ticket = auth.get_ticket(&creds()).await.unwrap();
        assert_eq!(ticket.token, "TGT-cached");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn miss_requests_and_caches_new_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TicketCache::in_dir(dir.path());
        cache
            .save(&Ticket::new("TGT-stale", Utc::now() - Duration::hours(3)))
            .unwrap();

        let issuer = FakeIssuer::new(CAS_BODY);
        let calls = issuer.calls.clone();
        let auth = Authenticator::new(cache.clone(), issuer);

        let ticket = auth.get_ticket(&creds()).await.unwrap();
        assert_eq!(ticket.token, "TGT-123-abcDEF-cas01");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.load().unwrap().token, "TGT-123-abcDEF-cas01");
    }

    #[tokio::test]
    async fn unparseable_response_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let auth = Authenticator::new(
            TicketCache::in_dir(dir.path()),
            FakeIssuer::new("<html>401</html>"),
        );

        let err = auth.get_ticket(&creds()).await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn cache_write_failure_does_not_fail_authentication() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TicketCache::new(dir.path().join("missing").join("cache.json"));
        let auth = Authenticator::new(cache, FakeIssuer::new(CAS_BODY));

        let ticket = auth.get_ticket(&creds()).await.unwrap();
        assert_eq!(ticket.token, "TGT-123-abcDEF-cas01");
    }

    #[tokio::test]
    async fn cas_issuer_posts_form_encoded_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cas/v1/tickets"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("username=alice&password=p%26ss+word"))
            .respond_with(ResponseTemplate::new(201).set_body_string(CAS_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let issuer = CasTicketIssuer::new(
            reqwest::Client::new(),
            format!("{}/cas/v1/tickets", server.uri()),
        );
        let body = issuer.request_ticket("alice", "p&ss word").await.unwrap();
        assert_eq!(extract_ticket(&body), Some("TGT-123-abcDEF-cas01"));
    }

    #[tokio::test]
    async fn cas_issuer_reports_rejected_credentials_as_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = TicketCache::in_dir(dir.path());
        let auth = Authenticator::new(
            cache.clone(),
            CasTicketIssuer::new(reqwest::Client::new(), server.uri()),
        );

        let err = auth.get_ticket(&creds()).await.unwrap_err();
        match err {
            Error::Http { status, body } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(body, "invalid credentials");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!cache.path().exists());
    }
}
