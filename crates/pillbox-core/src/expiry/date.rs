//! Calendar-date handling for expiry dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::{ExpiryError, ExpiryResult};

/// Storage format for expiry dates.
pub const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layouts without an offset that are accepted as dates.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// An expiry date with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpiryDate(NaiveDate);

impl ExpiryDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse an expiry date.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DD HH:MM:SS`.
    /// For timestamps the calendar date as written is kept and the time
    /// of day is dropped.
    pub fn parse(raw: &str) -> ExpiryResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExpiryError::InvalidDate("empty date".into()));
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, EXPIRY_DATE_FORMAT) {
            return Ok(Self(date));
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(instant.date_naive()));
        }

        NAIVE_TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(|dt| Self(dt.date()))
            .ok_or_else(|| ExpiryError::InvalidDate(format!("{:?} is not a calendar date", raw)))
    }

    /// Parse a date as read from storage, where it may be absent.
    pub fn from_stored(raw: Option<&str>) -> ExpiryResult<Self> {
        match raw {
            Some(value) => Self::parse(value),
            None => Err(ExpiryError::InvalidDate("missing date".into())),
        }
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Format for storage (`YYYY-MM-DD`).
    pub fn to_storage_string(self) -> String {
        self.0.format(EXPIRY_DATE_FORMAT).to_string()
    }
}

impl From<NaiveDate> for ExpiryDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(EXPIRY_DATE_FORMAT))
    }
}

impl std::str::FromStr for ExpiryDate {
    type Err = ExpiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Calendar day of an instant, in the instant's own zone.
pub fn calendar_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

/// Today's date in the local time zone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Whole days from `today` until `expiry`; negative once expired.
pub fn days_until_expiry(expiry: ExpiryDate, today: NaiveDate) -> i64 {
    (expiry.date() - today).num_days()
}
