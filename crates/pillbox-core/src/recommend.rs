//! Matching AI-recommended medicines against the household inventory.
//!
//! A recommendation is only matched to a record that can actually be used:
//! not expired, with units left, and with a readable expiry date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::expiry::{classify_all, ClassifiedMedicine, ExpiryPolicy, ExpiryStatus};
use crate::models::MedicineRecord;

/// Minimum name score for a record to count as a match.
const MIN_CONFIDENCE: f64 = 0.80;

/// Best usable inventory record for one recommended medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationMatch {
    /// Medicine name as recommended
    pub recommended: String,
    /// Matching inventory record, if any
    pub medicine: Option<MedicineRecord>,
    /// Status of the matched record
    pub status: Option<ExpiryStatus>,
    /// Name match quality (0.0 - 1.0); 0.0 when unmatched
    pub confidence: f64,
}

impl RecommendationMatch {
    pub fn is_available(&self) -> bool {
        self.medicine.is_some()
    }
}

/// Match each recommended name to the best usable inventory record.
///
/// Ties on confidence go to the record that expires first.
pub fn match_recommendations(
    recommended: &[String],
    records: &[MedicineRecord],
    today: NaiveDate,
    policy: &ExpiryPolicy,
) -> Vec<RecommendationMatch> {
    let (classified, _) = classify_all(records.iter().cloned(), today, policy);
    let usable: Vec<&ClassifiedMedicine> = classified
        .iter()
        .filter(|entry| entry.status != ExpiryStatus::Expired && entry.record.in_stock())
        .collect();

    recommended
        .iter()
        .map(|name| {
            let best = usable
                .iter()
                .map(|entry| (score_name(name, &entry.record.name), *entry))
                .filter(|(score, _)| *score >= MIN_CONFIDENCE)
                .max_by(|(sa, a), (sb, b)| {
                    sa.partial_cmp(sb)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| b.expiry.cmp(&a.expiry))
                });

            match best {
                Some((confidence, entry)) => {
                    tracing::debug!(
                        recommended = %name,
                        medicine_id = %entry.record.id,
                        confidence,
                        "Matched recommendation to inventory"
                    );
                    RecommendationMatch {
                        recommended: name.clone(),
                        medicine: Some(entry.record.clone()),
                        status: Some(entry.status),
                        confidence,
                    }
                }
                None => RecommendationMatch {
                    recommended: name.clone(),
                    medicine: None,
                    status: None,
                    confidence: 0.0,
                },
            }
        })
        .collect()
}

/// Score how well an inventory name matches a recommended name (0.0 - 1.0).
fn score_name(recommended: &str, inventory_name: &str) -> f64 {
    let query = recommended.trim().to_lowercase();
    let name = inventory_name.trim().to_lowercase();
    if query.is_empty() || name.is_empty() {
        return 0.0;
    }

    // "Paracetamol" vs "Paracetamol 500mg"
    if name.contains(&query) || query.contains(&name) {
        return 1.0;
    }

    // Compare against the leading word too, so strengths don't dilute typos
    let base = name.split_whitespace().next().unwrap_or(&name);
    fuzzy_match(&query, &name).max(fuzzy_match(&query, base))
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}
