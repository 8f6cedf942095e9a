use crate::domain::ticket::Ticket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = ".tgt_cache.json";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("ticket cache I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("ticket cache is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("ticket cache has no token")]
    MissingToken,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedTicket {
    #[serde(rename = "TGT", default)]
    tgt: Option<String>,
    #[serde(rename = "CreatedAt")]
    created_at: DateTime<Utc>,
}

/// File-backed cache holding at most one ticket.
#[derive(Debug, Clone)]
pub struct TicketCache {
    path: PathBuf,
}

impl TicketCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CACHE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<Ticket> {
        self.load_at(Utc::now())
    }

    /// Returns the cached ticket if it is still valid at `now`. Expired entries are
    /// removed; unreadable ones are left alone and treated as a miss.
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Ticket> {
        let ticket = match self.read() {
            Ok(Some(ticket)) => ticket,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable ticket cache");
                return None;
            }
        };

        if ticket.is_valid_at(now) {
            return Some(ticket);
        }

        tracing::info!(created_at = %ticket.created_at, "cached ticket expired");
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to remove expired ticket cache");
        }
        None
    }

    pub fn save(&self, ticket: &Ticket) -> Result<(), CacheError> {
        let entry = CachedTicket {
            tgt: Some(ticket.token.clone()),
            created_at: ticket.created_at,
        };
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn read(&self) -> Result<Option<Ticket>, CacheError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let entry = serde_json::from_str::<CachedTicket>(&text)?;
        let token = entry
            .tgt
            .filter(|t| !t.is_empty())
            .ok_or(CacheError::MissingToken)?;
        Ok(Some(Ticket::new(token, entry.created_at)))
    }
}
