//! Property tests for classification, partition and urgency ordering.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use pillbox_core::expiry::{
    classify, partition, sort_by_urgency, ExpiryPolicy, ExpiryStatus, Horizon,
};
use pillbox_core::models::MedicineRecord;
use proptest::prelude::*;

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn day(offset: u32) -> NaiveDate {
    base_day() + Days::new(u64::from(offset))
}

/// Dates roughly 2020-2030.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u32..3650).prop_map(day)
}

fn arb_horizon() -> impl Strategy<Value = Horizon> {
    prop_oneof![
        (0u32..24).prop_map(Horizon::Months),
        (0u32..400).prop_map(Horizon::Days),
    ]
}

/// Small name pool so ties on name actually happen.
fn arb_record() -> impl Strategy<Value = MedicineRecord> {
    let names = prop::sample::select(vec!["Aspirin", "Ibuprofen", "Paracetamol", "Zinc"]);
    let expiry = prop_oneof![
        8 => (0u32..3650).prop_map(|o| Some(day(o).format("%Y-%m-%d").to_string())),
        1 => Just(None),
        1 => Just(Some("not a date".to_string())),
    ];
    (names, expiry, 0u32..50).prop_map(|(name, expiry, quantity)| {
        MedicineRecord::new(name.to_string(), expiry, quantity)
    })
}

proptest! {
    #[test]
    fn prop_before_today_is_expired(today in arb_date(), back in 1u32..2000, horizon in arb_horizon()) {
        let expiry = today - Days::new(u64::from(back));
        let policy = ExpiryPolicy::new(horizon);
        prop_assert_eq!(classify(expiry.into(), today, &policy), ExpiryStatus::Expired);
    }

    #[test]
    fn prop_within_horizon_is_expiring_soon(today in arb_date(), horizon in arb_horizon(), frac in 0.0f64..=1.0) {
        let policy = ExpiryPolicy::new(horizon);
        let end = policy.horizon_end(today);
        let span = (end - today).num_days();
        let offset = (span as f64 * frac).floor() as u64;
        let expiry = today + Days::new(offset);
        prop_assert!(expiry <= end);
        prop_assert_eq!(classify(expiry.into(), today, &policy), ExpiryStatus::ExpiringSoon);
    }

    #[test]
    fn prop_after_horizon_is_valid(today in arb_date(), horizon in arb_horizon(), past in 1u32..2000) {
        let policy = ExpiryPolicy::new(horizon);
        let expiry = policy.horizon_end(today) + Days::new(u64::from(past));
        prop_assert_eq!(classify(expiry.into(), today, &policy), ExpiryStatus::Valid);
    }

    #[test]
    fn prop_partition_is_exact_cover(records in prop::collection::vec(arb_record(), 0..40), today in arb_date()) {
        let policy = ExpiryPolicy::default();
        let input_ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let result = partition(records, today, &policy);

        let mut seen = HashSet::new();
        let bucketed = result.expired.iter()
            .chain(result.expiring_soon.iter())
            .chain(result.valid.iter())
            .chain(result.rejected.iter().map(|r| &r.record));
        for record in bucketed {
            prop_assert!(seen.insert(record.id.clone()), "record {} in two buckets", record.id);
        }
        prop_assert_eq!(seen.len(), input_ids.len());
        prop_assert!(input_ids.iter().all(|id| seen.contains(id)));
    }

    #[test]
    fn prop_partition_keeps_input_order(records in prop::collection::vec(arb_record(), 0..40), today in arb_date()) {
        let position: std::collections::HashMap<String, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let result = partition(records, today, &ExpiryPolicy::default());

        for bucket in [&result.expired, &result.expiring_soon, &result.valid] {
            let positions: Vec<usize> = bucket.iter().map(|r| position[&r.id]).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_sort_is_idempotent(records in prop::collection::vec(arb_record(), 0..40), today in arb_date()) {
        let policy = ExpiryPolicy::default();
        let once = sort_by_urgency(records, today, &policy).into_records();
        let once_ids: Vec<String> = once.iter().map(|r| r.id.clone()).collect();

        let twice = sort_by_urgency(once, today, &policy).into_records();
        let twice_ids: Vec<String> = twice.iter().map(|r| r.id.clone()).collect();

        prop_assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn prop_sort_is_ordered_and_stable(records in prop::collection::vec(arb_record(), 0..40), today in arb_date()) {
        let position: std::collections::HashMap<String, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let order = sort_by_urgency(records, today, &ExpiryPolicy::default());

        for pair in order.entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key_a = (a.status, a.expiry, a.record.name.as_str());
            let key_b = (b.status, b.expiry, b.record.name.as_str());
            prop_assert!(key_a <= key_b);
            if key_a == key_b {
                prop_assert!(position[&a.record.id] < position[&b.record.id]);
            }
        }
    }
}

#[test]
fn test_partition_empty_has_all_buckets() {
    let result = partition(Vec::new(), day(0), &ExpiryPolicy::default());
    assert_eq!(result.bucket(ExpiryStatus::Expired).len(), 0);
    assert_eq!(result.bucket(ExpiryStatus::ExpiringSoon).len(), 0);
    assert_eq!(result.bucket(ExpiryStatus::Valid).len(), 0);
    assert_eq!(result.summary().total, 0);
}
