use crate::error::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

// EPİAŞ timestamps are always expressed at UTC+03:00.
const TR_OFFSET_SECS: i32 = 3 * 3600;
const PARAM_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn start_param(&self) -> String {
        self.start.format(PARAM_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(PARAM_FORMAT).to_string()
    }
}

pub fn tr_offset() -> Result<FixedOffset> {
    FixedOffset::east_opt(TR_OFFSET_SECS)
        .ok_or_else(|| Error::Config("invalid UTC+03:00 offset".to_string()))
}

/// Uses the configured bounds when both are present, otherwise
/// `[yesterday 00:00, today 00:00)` at UTC+03:00.
pub fn resolve_date_range(
    start: Option<&str>,
    end: Option<&str>,
    now_utc: DateTime<Utc>,
) -> Result<DateRange> {
    let offset = tr_offset()?;

    match (start, end) {
        (Some(start), Some(end)) => Ok(DateRange {
            start: at_offset(parse_bound(start)?, offset)?,
            end: at_offset(parse_bound(end)?, offset)?,
        }),
        (None, None) => default_range(now_utc, offset),
        (start, end) => {
            tracing::warn!(
                start = start.unwrap_or("-"),
                end = end.unwrap_or("-"),
                "only one of START_DATE/END_DATE set; using default range"
            );
            default_range(now_utc, offset)
        }
    }
}

fn default_range(now_utc: DateTime<Utc>, offset: FixedOffset) -> Result<DateRange> {
    let today = now_utc.with_timezone(&offset).date_naive();
    let yesterday = today - Duration::days(1);
    Ok(DateRange {
        start: at_offset(yesterday.and_time(NaiveTime::MIN), offset)?,
        end: at_offset(today.and_time(NaiveTime::MIN), offset)?,
    })
}

fn parse_bound(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(Error::Config(format!(
        "invalid date {s:?}; expected YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD"
    )))
}

fn at_offset(naive: NaiveDateTime, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| Error::Config(format!("{naive} is not representable at {offset}")))
}
