//! Client-side inventory filters.

use crate::models::MedicineRecord;

/// Records whose name contains `query`, case-insensitively.
///
/// An empty or blank query matches everything.
pub fn filter_by_name<'a>(records: &'a [MedicineRecord], query: &str) -> Vec<&'a MedicineRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
        .collect()
}

/// Records whose name, uses or category contains `query`, case-insensitively.
pub fn search<'a>(records: &'a [MedicineRecord], query: &str) -> Vec<&'a MedicineRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            let contains = |field: Option<&str>| {
                field.map_or(false, |value| value.to_lowercase().contains(&needle))
            };
            record.name.to_lowercase().contains(&needle)
                || contains(record.uses.as_deref())
                || contains(record.category.as_deref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cabinet() -> Vec<MedicineRecord> {
        let mut paracetamol = MedicineRecord::new("Paracetamol 500mg".into(), None, 24);
        paracetamol.category = Some("Pain Relief".into());
        paracetamol.uses = Some("Fever, headache, mild pain".into());

        let mut cetirizine = MedicineRecord::new("Cetirizine 10mg".into(), None, 30);
        cetirizine.category = Some("Antihistamine".into());
        cetirizine.uses = Some("Allergies, hay fever, itching".into());

        let omeprazole = MedicineRecord::new("Omeprazole 20mg".into(), None, 14);

        vec![paracetamol, cetirizine, omeprazole]
    }

    #[test]
    fn test_filter_by_name_case_insensitive() {
        let records = cabinet();
        let hits = filter_by_name(&records, "PARA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Paracetamol 500mg");
    }

    #[test]
    fn test_filter_by_name_empty_query() {
        let records = cabinet();
        assert_eq!(filter_by_name(&records, "  ").len(), 3);
    }

    #[test]
    fn test_search_uses_and_category() {
        let records = cabinet();

        let fever = search(&records, "fever");
        assert_eq!(fever.len(), 2);

        let pain = search(&records, "pain relief");
        assert_eq!(pain.len(), 1);
        assert_eq!(pain[0].name, "Paracetamol 500mg");

        assert!(search(&records, "antibiotic").is_empty());
        assert_eq!(search(&records, "").len(), 3);
    }
}
