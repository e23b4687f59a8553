//! Medicine inventory models.

use serde::{Deserialize, Serialize};

/// A medicine held in the household inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Local UUID - generated on creation
    pub id: String,
    /// Display name (e.g., "Paracetamol 500mg")
    pub name: String,
    /// Expiry date as stored, normally `YYYY-MM-DD`
    pub expiry_date: Option<String>,
    /// Remaining units
    pub quantity: u32,
    /// How often it is taken (display only)
    pub frequency: Option<String>,
    /// Dosage instructions (display only)
    pub dosage: Option<String>,
    /// Category (e.g., "Pain Relief", "Antibiotic")
    pub category: Option<String>,
    /// What it is used for (e.g., "Fever, headache")
    pub uses: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl MedicineRecord {
    /// Create a new record with required fields.
    pub fn new(name: String, expiry_date: Option<String>, quantity: u32) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            expiry_date,
            quantity,
            frequency: None,
            dosage: None,
            category: None,
            uses: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether any units remain.
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Replacement of an existing medicine with a fresh pack.
///
/// Name, expiry and quantity are always substituted together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineReplacement {
    pub name: String,
    pub expiry_date: String,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_medicine() {
        let med = MedicineRecord::new("Paracetamol 500mg".into(), Some("2025-12-31".into()), 24);
        assert_eq!(med.name, "Paracetamol 500mg");
        assert_eq!(med.expiry_date.as_deref(), Some("2025-12-31"));
        assert_eq!(med.quantity, 24);
        assert!(med.in_stock());
        assert_eq!(med.id.len(), 36); // UUID format
    }

    #[test]
    fn test_empty_stock() {
        let med = MedicineRecord::new("Cetirizine 10mg".into(), None, 0);
        assert!(!med.in_stock());
    }
}
