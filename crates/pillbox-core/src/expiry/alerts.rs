//! Expiry alerts for notification and banner views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{days_until_expiry, sort_by_urgency, ExpiryDate, ExpiryPolicy, ExpiryStatus};
use crate::models::MedicineRecord;

/// A medicine that needs attention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryAlert {
    pub medicine_id: String,
    pub name: String,
    pub expiry_date: ExpiryDate,
    pub status: ExpiryStatus,
    /// Days until expiry; negative once expired
    pub days_remaining: i64,
    pub quantity: u32,
}

impl ExpiryAlert {
    /// Short notification text.
    pub fn message(&self) -> String {
        match (self.status, self.days_remaining) {
            (ExpiryStatus::Expired, -1) => format!("{} expired yesterday", self.name),
            (ExpiryStatus::Expired, days) => format!("{} expired {} days ago", self.name, -days),
            (_, 0) => format!("{} expires today", self.name),
            (_, 1) => format!("{} expires tomorrow", self.name),
            (_, days) => format!("{} expires in {} days", self.name, days),
        }
    }
}

/// Alerts for every expired or expiring-soon record, most urgent first.
///
/// Records with unreadable dates are skipped; they surface through
/// [`super::partition`] instead.
pub fn collect_alerts<I>(records: I, today: NaiveDate, policy: &ExpiryPolicy) -> Vec<ExpiryAlert>
where
    I: IntoIterator<Item = MedicineRecord>,
{
    let order = sort_by_urgency(records, today, policy);

    order
        .entries
        .into_iter()
        .filter(|entry| entry.status.needs_attention())
        .filter(|entry| policy.alert_empty_stock || entry.record.in_stock())
        .map(|entry| ExpiryAlert {
            days_remaining: days_until_expiry(entry.expiry, today),
            medicine_id: entry.record.id,
            name: entry.record.name,
            expiry_date: entry.expiry,
            status: entry.status,
            quantity: entry.record.quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn med(name: &str, expiry: &str, quantity: u32) -> MedicineRecord {
        MedicineRecord::new(name.into(), Some(expiry.into()), quantity)
    }

    #[test]
    fn test_collect_alerts_skips_valid() {
        let today = date(2025, 1, 15);
        let records = vec![
            med("Cetirizine 10mg", "2026-05-20", 30),
            med("Ibuprofen 400mg", "2025-01-20", 16),
            med("Amoxicillin 250mg", "2024-10-15", 10),
        ];

        let alerts = collect_alerts(records, today, &ExpiryPolicy::default());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].name, "Amoxicillin 250mg");
        assert_eq!(alerts[0].status, ExpiryStatus::Expired);
        assert_eq!(alerts[0].days_remaining, -92);
        assert_eq!(alerts[1].name, "Ibuprofen 400mg");
        assert_eq!(alerts[1].days_remaining, 5);
    }

    #[test]
    fn test_empty_stock_policy() {
        let today = date(2025, 1, 15);
        let records = vec![med("Omeprazole 20mg", "2024-11-30", 0)];

        let alerts = collect_alerts(records.clone(), today, &ExpiryPolicy::default());
        assert_eq!(alerts.len(), 1);

        let quiet = ExpiryPolicy::default().with_alert_empty_stock(false);
        assert!(collect_alerts(records, today, &quiet).is_empty());
    }

    #[test]
    fn test_alert_messages() {
        let today = date(2025, 1, 15);
        let records = vec![
            med("A", "2025-01-14", 1),
            med("B", "2025-01-10", 1),
            med("C", "2025-01-15", 1),
            med("D", "2025-01-16", 1),
            med("E", "2025-02-14", 1),
        ];

        let messages: Vec<String> = collect_alerts(records, today, &ExpiryPolicy::default())
            .iter()
            .map(ExpiryAlert::message)
            .collect();

        assert_eq!(
            messages,
            vec![
                "B expired 5 days ago",
                "A expired yesterday",
                "C expires today",
                "D expires tomorrow",
                "E expires in 30 days",
            ]
        );
    }
}
