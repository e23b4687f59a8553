//! Per-record expiry decision rule.

use chrono::NaiveDate;

use super::{ExpiryDate, ExpiryPolicy, ExpiryResult, ExpiryStatus};
use crate::models::MedicineRecord;

/// Classify an expiry date against `today`.
///
/// Rules, first match wins:
/// 1. `expiry < today` → `Expired` (expiring today is not expired)
/// 2. `expiry <= horizon end` → `ExpiringSoon` (the horizon end is inclusive)
/// 3. otherwise → `Valid`
pub fn classify(expiry: ExpiryDate, today: NaiveDate, policy: &ExpiryPolicy) -> ExpiryStatus {
    let expiry = expiry.date();
    if expiry < today {
        ExpiryStatus::Expired
    } else if expiry <= policy.horizon_end(today) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Valid
    }
}

/// Parse and classify a raw date string.
pub fn classify_str(raw: &str, today: NaiveDate, policy: &ExpiryPolicy) -> ExpiryResult<ExpiryStatus> {
    ExpiryDate::parse(raw).map(|expiry| classify(expiry, today, policy))
}

/// Classify a stored medicine record.
pub fn classify_record(
    record: &MedicineRecord,
    today: NaiveDate,
    policy: &ExpiryPolicy,
) -> ExpiryResult<ExpiryStatus> {
    ExpiryDate::from_stored(record.expiry_date.as_deref()).map(|expiry| classify(expiry, today, policy))
}
