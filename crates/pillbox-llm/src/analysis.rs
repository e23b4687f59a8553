//! Symptom analysis replies and the recommendations derived from them.

use serde::{Deserialize, Serialize};

use crate::extraction::{clean_list, parse_embedded, ExtractionResult};

const FALLBACK_REASON: &str = "May help with symptoms";
const DEFAULT_DOSAGE: &str = "As directed on packaging";
const MAX_ALTERNATIVES: usize = 2;
const MAX_HOME_REMEDIES: usize = 3;

const FALLBACK_SELF_CARE: &[&str] = &[
    "Rest well",
    "Stay hydrated",
    "Consult a healthcare professional if symptoms worsen",
];

/// Symptom analysis as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SymptomAnalysis {
    pub recommended_medicines: Vec<String>,
    pub possible_conditions: Vec<String>,
    pub self_care_advice: Vec<String>,
}

/// One recommended medicine, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub medicine: String,
    pub reason: String,
    pub dosage: String,
    pub alternatives: Vec<String>,
    pub home_remedies: Vec<String>,
}

impl SymptomAnalysis {
    /// Generic analysis used when the model is unreachable or unreadable.
    pub fn fallback() -> Self {
        Self {
            recommended_medicines: vec!["Paracetamol".into(), "Ibuprofen".into()],
            possible_conditions: vec!["General symptoms".into()],
            self_care_advice: vec![
                "Rest well".into(),
                "Stay hydrated".into(),
                "Consult a doctor if symptoms persist".into(),
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recommended_medicines.is_empty()
    }

    /// One recommendation per recommended medicine, in reply order.
    ///
    /// Reasons cycle through the possible conditions.
    pub fn to_recommendations(&self) -> Vec<Recommendation> {
        let home_remedies: Vec<String> = if self.self_care_advice.is_empty() {
            FALLBACK_SELF_CARE.iter().map(|s| s.to_string()).collect()
        } else {
            self.self_care_advice
                .iter()
                .take(MAX_HOME_REMEDIES)
                .cloned()
                .collect()
        };

        self.recommended_medicines
            .iter()
            .enumerate()
            .map(|(index, medicine)| {
                let reason = if self.possible_conditions.is_empty() {
                    FALLBACK_REASON.to_string()
                } else {
                    self.possible_conditions[index % self.possible_conditions.len()].clone()
                };

                let alternatives = self
                    .recommended_medicines
                    .iter()
                    .filter(|other| *other != medicine)
                    .take(MAX_ALTERNATIVES)
                    .cloned()
                    .collect();

                Recommendation {
                    medicine: medicine.clone(),
                    reason,
                    dosage: DEFAULT_DOSAGE.to_string(),
                    alternatives,
                    home_remedies: home_remedies.clone(),
                }
            })
            .collect()
    }

    fn cleaned(self) -> Self {
        Self {
            recommended_medicines: clean_list(self.recommended_medicines),
            possible_conditions: clean_list(self.possible_conditions),
            self_care_advice: clean_list(self.self_care_advice),
        }
    }
}

/// Parse a symptom analysis reply. Missing lists come back empty.
pub fn parse_symptom_analysis(reply: &str) -> ExtractionResult<SymptomAnalysis> {
    let analysis: SymptomAnalysis = parse_embedded(reply)?;
    Ok(analysis.cleaned())
}

/// Parse a reply, falling back to [`SymptomAnalysis::fallback`] when it is
/// unreadable or recommends nothing.
pub fn analysis_or_fallback(reply: &str) -> SymptomAnalysis {
    match parse_symptom_analysis(reply) {
        Ok(analysis) if !analysis.is_empty() => analysis,
        Ok(_) => {
            tracing::warn!("Symptom analysis recommended no medicines, using fallback");
            SymptomAnalysis::fallback()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable symptom analysis, using fallback");
            SymptomAnalysis::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionError;

    fn analysis(meds: &[&str], conditions: &[&str], advice: &[&str]) -> SymptomAnalysis {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        SymptomAnalysis {
            recommended_medicines: owned(meds),
            possible_conditions: owned(conditions),
            self_care_advice: owned(advice),
        }
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"Here is my analysis:
{
  "recommendedMedicines": ["Paracetamol", " Ibuprofen "],
  "possibleConditions": ["Common cold"],
  "selfCareAdvice": ["Rest", ""]
}
Please see a doctor if this gets worse."#;

        let parsed = parse_symptom_analysis(reply).unwrap();
        assert_eq!(parsed.recommended_medicines, vec!["Paracetamol", "Ibuprofen"]);
        assert_eq!(parsed.possible_conditions, vec!["Common cold"]);
        assert_eq!(parsed.self_care_advice, vec!["Rest"]);
    }

    #[test]
    fn test_parse_missing_lists() {
        let parsed = parse_symptom_analysis(r#"{"recommendedMedicines": ["Loratadine"]}"#).unwrap();
        assert_eq!(parsed.recommended_medicines, vec!["Loratadine"]);
        assert!(parsed.possible_conditions.is_empty());
        assert!(parsed.self_care_advice.is_empty());
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_symptom_analysis("Please consult a doctor."),
            Err(ExtractionError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_reasons_cycle() {
        let recs = analysis(&["A", "B", "C"], &["Cold", "Flu"], &["Rest"]).to_recommendations();
        let reasons: Vec<&str> = recs.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(reasons, vec!["Cold", "Flu", "Cold"]);
        assert!(recs.iter().all(|r| r.dosage == "As directed on packaging"));
    }

    #[test]
    fn test_fallback_reason_and_remedies() {
        let recs = analysis(&["Paracetamol"], &[], &[]).to_recommendations();
        assert_eq!(recs[0].reason, "May help with symptoms");
        assert_eq!(
            recs[0].home_remedies,
            vec![
                "Rest well",
                "Stay hydrated",
                "Consult a healthcare professional if symptoms worsen"
            ]
        );
        assert!(recs[0].alternatives.is_empty());
    }

    #[test]
    fn test_alternatives_and_remedies_capped() {
        let recs = analysis(&["A", "B", "C", "D"], &["X"], &["r1", "r2", "r3", "r4"])
            .to_recommendations();
        assert_eq!(recs[0].alternatives, vec!["B", "C"]);
        assert_eq!(recs[2].alternatives, vec!["A", "B"]);
        assert_eq!(recs[3].home_remedies, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_analysis_or_fallback() {
        assert_eq!(analysis_or_fallback("garbage"), SymptomAnalysis::fallback());
        assert_eq!(analysis_or_fallback("{}"), SymptomAnalysis::fallback());

        let parsed = analysis_or_fallback(r#"{"recommendedMedicines":["Cetirizine"]}"#);
        assert_eq!(parsed.recommended_medicines, vec!["Cetirizine"]);
    }

    #[test]
    fn test_recommendation_serializes_camel_case() {
        let recs = analysis(&["A"], &[], &[]).to_recommendations();
        let json = serde_json::to_string(&recs[0]).unwrap();
        assert!(json.contains("\"homeRemedies\""));
    }
}
