//! Alerting horizon policy.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{ExpiryError, ExpiryResult};

/// Default horizon: three calendar months.
pub const DEFAULT_HORIZON_MONTHS: u32 = 3;

/// How far ahead of today a medicine counts as expiring soon.
///
/// Month horizons use calendar-month addition clamped to the end of the
/// target month (Jan 31 + 1 month = Feb 28, or Feb 29 in leap years).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum Horizon {
    Months(u32),
    Days(u32),
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon::Months(DEFAULT_HORIZON_MONTHS)
    }
}

impl Horizon {
    /// Month horizon from an untrusted count.
    pub fn months(count: i64) -> ExpiryResult<Self> {
        checked_count(count, "months").map(Horizon::Months)
    }

    /// Day horizon from an untrusted count.
    pub fn days(count: i64) -> ExpiryResult<Self> {
        checked_count(count, "days").map(Horizon::Days)
    }

    /// Last date (inclusive) that still counts as expiring soon.
    ///
    /// Saturates at the largest representable date.
    pub fn end_date(self, today: NaiveDate) -> NaiveDate {
        let end = match self {
            Horizon::Months(n) => today.checked_add_months(Months::new(n)),
            Horizon::Days(n) => today.checked_add_days(Days::new(u64::from(n))),
        };
        end.unwrap_or(NaiveDate::MAX)
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Horizon::Months(n) => write!(f, "{} month(s)", n),
            Horizon::Days(n) => write!(f, "{} day(s)", n),
        }
    }
}

fn checked_count(count: i64, unit: &str) -> ExpiryResult<u32> {
    if count < 0 {
        return Err(ExpiryError::InvalidArgument(format!(
            "horizon must not be negative, got {} {}",
            count, unit
        )));
    }
    u32::try_from(count).map_err(|_| {
        ExpiryError::InvalidArgument(format!("horizon of {} {} is too large", count, unit))
    })
}

/// Classification and alerting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryPolicy {
    /// Expiring-soon window
    pub horizon: Horizon,
    /// Whether medicines with no units left still raise alerts
    pub alert_empty_stock: bool,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            horizon: Horizon::default(),
            alert_empty_stock: true,
        }
    }
}

impl ExpiryPolicy {
    /// Policy with the given horizon and default alerting.
    pub fn new(horizon: Horizon) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    /// Policy with a fixed-day horizon; fails on a negative count.
    pub fn from_horizon_days(days: i64) -> ExpiryResult<Self> {
        Horizon::days(days).map(Self::new)
    }

    /// Policy with a calendar-month horizon; fails on a negative count.
    pub fn from_horizon_months(months: i64) -> ExpiryResult<Self> {
        Horizon::months(months).map(Self::new)
    }

    pub fn with_alert_empty_stock(mut self, alert: bool) -> Self {
        self.alert_empty_stock = alert;
        self
    }

    /// Inclusive end of the expiring-soon window for `today`.
    pub fn horizon_end(&self, today: NaiveDate) -> NaiveDate {
        self.horizon.end_date(today)
    }
}
