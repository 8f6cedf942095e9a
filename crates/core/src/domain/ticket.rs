use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Tickets are accepted for this many hours after issuance.
pub const TICKET_TTL_HOURS: i64 = 2;

#[derive(Clone, PartialEq, Eq)]
pub struct Ticket {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(token: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            created_at,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < Duration::hours(TICKET_TTL_HOURS)
    }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("token", &format_args!("<{} chars>", self.token.len()))
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expires_exactly_at_two_hours() {
        let issued = Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap();
        let ticket = Ticket::new("TGT-1", issued);

        assert!(ticket.is_valid_at(issued));
        assert!(ticket.is_valid_at(issued + Duration::minutes(119)));
        assert!(!ticket.is_valid_at(issued + Duration::hours(2)));
        assert!(!ticket.is_valid_at(issued + Duration::hours(3)));
    }

    #[test]
    fn debug_hides_token() {
        let ticket = Ticket::new("TGT-secret", Utc::now());
        assert!(!format!("{ticket:?}").contains("TGT-secret"));
    }
}
