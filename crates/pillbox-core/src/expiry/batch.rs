//! Batch classification: partition and urgency ordering.
//!
//! A record whose expiry date cannot be read is set aside as a
//! [`RejectedRecord`]; it never aborts the rest of the batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{classify, ExpiryDate, ExpiryError, ExpiryPolicy, ExpiryStatus};
use crate::models::MedicineRecord;

/// A record together with its derived status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedMedicine {
    pub record: MedicineRecord,
    pub expiry: ExpiryDate,
    pub status: ExpiryStatus,
}

/// A record that could not be classified.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub record: MedicineRecord,
    pub error: ExpiryError,
}

/// Records bucketed by status, input order kept within each bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub expired: Vec<MedicineRecord>,
    pub expiring_soon: Vec<MedicineRecord>,
    pub valid: Vec<MedicineRecord>,
    pub rejected: Vec<RejectedRecord>,
}

impl Partition {
    /// Records in the bucket for `status`.
    pub fn bucket(&self, status: ExpiryStatus) -> &[MedicineRecord] {
        match status {
            ExpiryStatus::Expired => &self.expired,
            ExpiryStatus::ExpiringSoon => &self.expiring_soon,
            ExpiryStatus::Valid => &self.valid,
        }
    }

    /// Total records seen, rejected ones included.
    pub fn len(&self) -> usize {
        self.expired.len() + self.expiring_soon.len() + self.valid.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counter-card totals.
    pub fn summary(&self) -> ExpirySummary {
        ExpirySummary {
            expired: self.expired.len(),
            expiring_soon: self.expiring_soon.len(),
            valid: self.valid.len(),
            invalid: self.rejected.len(),
            total: self.len(),
        }
    }
}

/// Per-status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirySummary {
    pub expired: usize,
    pub expiring_soon: usize,
    pub valid: usize,
    pub invalid: usize,
    pub total: usize,
}

/// Records in urgency order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrgencyOrder {
    pub entries: Vec<ClassifiedMedicine>,
    pub rejected: Vec<RejectedRecord>,
}

impl UrgencyOrder {
    /// Ordered records without their statuses.
    pub fn records(&self) -> impl Iterator<Item = &MedicineRecord> {
        self.entries.iter().map(|entry| &entry.record)
    }

    pub fn into_records(self) -> Vec<MedicineRecord> {
        self.entries.into_iter().map(|entry| entry.record).collect()
    }
}

/// Classify every record, keeping input order.
pub fn classify_all<I>(
    records: I,
    today: NaiveDate,
    policy: &ExpiryPolicy,
) -> (Vec<ClassifiedMedicine>, Vec<RejectedRecord>)
where
    I: IntoIterator<Item = MedicineRecord>,
{
    let mut classified = Vec::new();
    let mut rejected = Vec::new();

    for record in records {
        match ExpiryDate::from_stored(record.expiry_date.as_deref()) {
            Ok(expiry) => {
                let status = classify(expiry, today, policy);
                classified.push(ClassifiedMedicine {
                    record,
                    expiry,
                    status,
                });
            }
            Err(error) => {
                tracing::warn!(
                    medicine_id = %record.id,
                    name = %record.name,
                    error = %error,
                    "Medicine has an unreadable expiry date"
                );
                rejected.push(RejectedRecord { record, error });
            }
        }
    }

    (classified, rejected)
}

/// Stable partition into expired, expiring-soon and valid buckets.
///
/// All buckets are always present; empty input yields empty buckets.
pub fn partition<I>(records: I, today: NaiveDate, policy: &ExpiryPolicy) -> Partition
where
    I: IntoIterator<Item = MedicineRecord>,
{
    let (classified, rejected) = classify_all(records, today, policy);

    let mut result = Partition {
        rejected,
        ..Partition::default()
    };
    for entry in classified {
        match entry.status {
            ExpiryStatus::Expired => result.expired.push(entry.record),
            ExpiryStatus::ExpiringSoon => result.expiring_soon.push(entry.record),
            ExpiryStatus::Valid => result.valid.push(entry.record),
        }
    }

    tracing::debug!(
        %today,
        horizon = %policy.horizon,
        expired = result.expired.len(),
        expiring_soon = result.expiring_soon.len(),
        valid = result.valid.len(),
        rejected = result.rejected.len(),
        "Partitioned inventory by expiry"
    );

    result
}

/// Order records by status rank, then expiry date, then name.
///
/// The sort is stable: records with identical keys keep their input order,
/// so sorting an already sorted list returns it unchanged.
pub fn sort_by_urgency<I>(records: I, today: NaiveDate, policy: &ExpiryPolicy) -> UrgencyOrder
where
    I: IntoIterator<Item = MedicineRecord>,
{
    let (mut entries, rejected) = classify_all(records, today, policy);

    entries.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then_with(|| a.expiry.cmp(&b.expiry))
            .then_with(|| a.record.name.cmp(&b.record.name))
    });

    UrgencyOrder { entries, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn med(name: &str, expiry: Option<&str>) -> MedicineRecord {
        MedicineRecord::new(name.into(), expiry.map(Into::into), 10)
    }

    fn names(records: &[MedicineRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn cabinet() -> Vec<MedicineRecord> {
        vec![
            med("Paracetamol 500mg", Some("2025-12-31")),
            med("Amoxicillin 250mg", Some("2024-10-15")),
            med("Cetirizine 10mg", Some("2026-05-20")),
            med("Ibuprofen 400mg", Some("2025-03-10")),
            med("Omeprazole 20mg", Some("2024-11-30")),
            med("Loratadine 10mg", None),
        ]
    }

    #[test]
    fn test_partition_buckets() {
        let today = date(2025, 1, 15);
        let result = partition(cabinet(), today, &ExpiryPolicy::default());

        assert_eq!(names(&result.expired), vec!["Amoxicillin 250mg", "Omeprazole 20mg"]);
        assert_eq!(names(&result.expiring_soon), vec!["Ibuprofen 400mg"]);
        assert_eq!(names(&result.valid), vec!["Paracetamol 500mg", "Cetirizine 10mg"]);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].record.name, "Loratadine 10mg");
        assert!(matches!(result.rejected[0].error, ExpiryError::InvalidDate(_)));
    }

    #[test]
    fn test_partition_empty_input() {
        let result = partition(Vec::new(), date(2025, 1, 15), &ExpiryPolicy::default());
        assert!(result.expired.is_empty());
        assert!(result.expiring_soon.is_empty());
        assert!(result.valid.is_empty());
        assert!(result.rejected.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let result = partition(cabinet(), date(2025, 1, 15), &ExpiryPolicy::default());
        let summary = result.summary();
        assert_eq!(summary.expired, 2);
        assert_eq!(summary.expiring_soon, 1);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.total, 6);
        assert_eq!(result.bucket(ExpiryStatus::ExpiringSoon).len(), 1);
    }

    #[test]
    fn test_sort_by_urgency_order() {
        let today = date(2025, 1, 15);
        let order = sort_by_urgency(cabinet(), today, &ExpiryPolicy::default());
        let sorted: Vec<&str> = order.records().map(|r| r.name.as_str()).collect();

        assert_eq!(
            sorted,
            vec![
                "Amoxicillin 250mg",
                "Omeprazole 20mg",
                "Ibuprofen 400mg",
                "Paracetamol 500mg",
                "Cetirizine 10mg",
            ]
        );
        assert_eq!(order.rejected.len(), 1);
    }

    #[test]
    fn test_sort_name_tie_break() {
        let today = date(2025, 1, 15);
        let records = vec![
            med("Zinc", Some("2025-02-01")),
            med("Aspirin", Some("2025-02-01")),
        ];
        let order = sort_by_urgency(records, today, &ExpiryPolicy::default());
        let sorted: Vec<&str> = order.records().map(|r| r.name.as_str()).collect();
        assert_eq!(sorted, vec!["Aspirin", "Zinc"]);
    }

    #[test]
    fn test_sort_is_stable_for_identical_keys() {
        let today = date(2025, 1, 15);
        let first = med("Aspirin", Some("2025-02-01"));
        let second = med("Aspirin", Some("2025-02-01"));
        let (first_id, second_id) = (first.id.clone(), second.id.clone());

        let order = sort_by_urgency(vec![first, second], today, &ExpiryPolicy::default());
        let ids: Vec<&str> = order.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![first_id.as_str(), second_id.as_str()]);
    }
}
