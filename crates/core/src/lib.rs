pub mod aggregate;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod report;
pub mod storage;
pub mod time;

pub use error::{Error, Result};

pub mod config {
    use crate::error::{Error, Result};
    use std::collections::HashMap;
    use std::fmt;
    use std::fs;
    use std::io;
    use std::path::Path;

    const DEFAULT_TGT_URL: &str = "https://giris.epias.com.tr/cas/v1/tickets";
    const DEFAULT_TRANSACTIONS_URL: &str =
        "https://seffaflik.epias.com.tr/electricity-service/v1/markets/idm/data/transaction-history";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub username: Option<String>,
        pub password: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub tgt_url: String,
        pub transactions_url: String,
        pub sentry_dsn: Option<String>,
    }

    #[derive(Clone)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    impl fmt::Debug for Credentials {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Credentials")
                .field("username", &self.username)
                .field("password", &"<redacted>")
                .finish()
        }
    }

    impl Settings {
        /// Reads `env_file` (if present) and falls back to the process environment for
        /// keys the file does not set.
        pub fn load(env_file: &Path) -> Result<Self> {
            let file_vars = read_env_file(env_file)?;
            Ok(Self::from_lookup(|key| {
                file_vars
                    .get(key)
                    .cloned()
                    .or_else(|| std::env::var(key).ok())
            }))
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
            let get = |key: &str| {
                lookup(key)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            };

            Self {
                username: get("EPIAS_USERNAME"),
                password: get("EPIAS_PASSWORD"),
                start_date: get("START_DATE"),
                end_date: get("END_DATE"),
                tgt_url: get("EPIAS_TGT_URL").unwrap_or_else(|| DEFAULT_TGT_URL.to_string()),
                transactions_url: get("EPIAS_TRANSACTIONS_URL")
                    .unwrap_or_else(|| DEFAULT_TRANSACTIONS_URL.to_string()),
                sentry_dsn: get("SENTRY_DSN"),
            }
        }

        pub fn credentials(&self) -> Result<Credentials> {
            match (self.username.as_deref(), self.password.as_deref()) {
                (Some(username), Some(password)) => Ok(Credentials {
                    username: username.to_string(),
                    password: password.to_string(),
                }),
                _ => Err(Error::Config(
                    "EPIAS_USERNAME and EPIAS_PASSWORD are required".to_string(),
                )),
            }
        }
    }

    fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "env file not found; using process environment");
                return Ok(HashMap::new());
            }
            Err(err) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
        };
        Ok(parse_env_lines(&text))
    }

    /// `KEY=value` lines; blank and `#` lines are skipped, the first `=` splits, and
    /// values are taken literally (no quoting, escapes or `$` expansion).
    pub fn parse_env_lines(text: &str) -> HashMap<String, String> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut out = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                tracing::debug!(line = idx + 1, "skipping env line without '='");
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                tracing::debug!(line = idx + 1, "skipping env line with empty key");
                continue;
            }
            out.insert(key.to_string(), value.trim().to_string());
        }
        out
    }

}
