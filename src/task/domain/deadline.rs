//! Due date parsing.

use super::TaskDomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses a client-supplied due date.
///
/// Zone-less values are read as UTC. An empty string means no deadline.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] when the value matches none of
/// the accepted formats.
pub fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>, TaskDomainError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TaskDomainError::InvalidDueDate(raw.to_owned()))?;
    Ok(Some(naive.and_utc()))
}
