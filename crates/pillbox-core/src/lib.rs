//! Pillbox Core Library
//!
//! Local-first household medicine inventory with expiry tracking.
//!
//! # Architecture
//!
//! ```text
//! Manual entry / label scan ──▶ medicines table (SQLite)
//!                                      │
//!                          snapshot + one `today`
//!                                      │
//!                       ┌──────────────▼──────────────┐
//!                       │      Expiry classifier      │
//!                       │ Expired / ExpiringSoon /    │
//!                       │ Valid (never stored)        │
//!                       └──────────────┬──────────────┘
//!                                      │
//!              ┌───────────────────────┼───────────────────────┐
//!              ▼                       ▼                       ▼
//!        Expiry buckets          Urgency list            Alerts and
//!        + counters              (table views)       recommendation matching
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite storage for medicine records
//! - [`models`]: Domain types (MedicineRecord, MedicineReplacement)
//! - [`expiry`]: Lifecycle classifier, partition, urgency order, alerts
//! - [`inventory`]: Name and keyword filters
//! - [`recommend`]: Matching recommended medicines to usable stock
//! - [`config`]: Settings and logging setup

pub mod config;
pub mod db;
pub mod expiry;
pub mod inventory;
pub mod models;
pub mod recommend;

// Re-export commonly used types
pub use config::Settings;
pub use db::Database;
pub use expiry::{
    classify, partition, sort_by_urgency, ExpiryAlert, ExpiryDate, ExpiryError, ExpiryPolicy,
    ExpiryStatus, ExpirySummary, Horizon, Partition, UrgencyOrder,
};
pub use models::{MedicineRecord, MedicineReplacement};
pub use recommend::{match_recommendations, RecommendationMatch};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PillboxError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for PillboxError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(id) => PillboxError::NotFound(id),
            db::DbError::Constraint(msg) => PillboxError::InvalidInput(msg),
            other => PillboxError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ExpiryError> for PillboxError {
    fn from(e: ExpiryError) -> Self {
        match e {
            ExpiryError::InvalidDate(msg) => PillboxError::InvalidDate(msg),
            ExpiryError::InvalidArgument(msg) => PillboxError::InvalidInput(msg),
        }
    }
}

impl From<config::ConfigError> for PillboxError {
    fn from(e: config::ConfigError) -> Self {
        PillboxError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PillboxError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PillboxError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// The expiry policy comes from default settings plus environment overrides.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<PillboxCore>, PillboxError> {
    config::init_tracing();
    let settings = Settings::default().with_env_overrides()?;
    let db = Database::open(&path)?;
    Ok(PillboxCore::new(db, settings.policy()))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<PillboxCore>, PillboxError> {
    let db = Database::open_in_memory()?;
    Ok(PillboxCore::new(db, ExpiryPolicy::default()))
}

/// Open using JSON settings (plus environment overrides).
///
/// Uses an in-memory database when no `database_path` is configured.
#[uniffi::export]
pub fn open_with_settings(settings_json: String) -> Result<Arc<PillboxCore>, PillboxError> {
    config::init_tracing();
    let settings = Settings::from_json_str(&settings_json)?.with_env_overrides()?;
    let db = match &settings.database_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    Ok(PillboxCore::new(db, settings.policy()))
}

/// Classify a single expiry date without touching storage.
///
/// `today` defaults to the local calendar date.
#[uniffi::export]
pub fn classify_expiry_date(
    expiry_date: String,
    today: Option<String>,
    horizon_months: u32,
) -> Result<FfiExpiryStatus, PillboxError> {
    let today = resolve_today(today)?;
    let expiry = ExpiryDate::parse(&expiry_date)?;
    let policy = ExpiryPolicy::new(Horizon::Months(horizon_months));
    Ok(classify(expiry, today, &policy).into())
}

fn resolve_today(today: Option<String>) -> Result<NaiveDate, PillboxError> {
    match today {
        Some(raw) => Ok(ExpiryDate::parse(&raw)?.date()),
        None => Ok(expiry::local_today()),
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PillboxCore {
    db: Arc<Mutex<Database>>,
    policy: ExpiryPolicy,
}

impl PillboxCore {
    fn new(db: Database, policy: ExpiryPolicy) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            policy,
        })
    }

    /// Snapshot of all medicines, taken under one lock.
    fn snapshot(&self) -> Result<Vec<MedicineRecord>, PillboxError> {
        let db = self.db.lock()?;
        Ok(db.list_medicines()?)
    }
}

#[uniffi::export]
impl PillboxCore {
    // =========================================================================
    // Inventory Operations
    // =========================================================================

    /// Add a medicine (manual entry or confirmed label scan).
    pub fn add_medicine(&self, medicine: FfiNewMedicine) -> Result<FfiMedicine, PillboxError> {
        if medicine.name.trim().is_empty() {
            return Err(PillboxError::InvalidInput("medicine name is empty".into()));
        }
        if let Some(raw) = &medicine.expiry_date {
            ExpiryDate::parse(raw)?;
        }
        let db = self.db.lock()?;
        let record: MedicineRecord = medicine.into();
        db.insert_medicine(&record)?;
        let stored = db
            .get_medicine(&record.id)?
            .ok_or_else(|| PillboxError::NotFound(record.id.clone()))?;
        Ok(stored.into())
    }

    /// Get a medicine by ID.
    pub fn get_medicine(&self, id: String) -> Result<Option<FfiMedicine>, PillboxError> {
        let db = self.db.lock()?;
        let medicine = db.get_medicine(&id)?;
        Ok(medicine.map(|m| m.into()))
    }

    /// List all medicines, newest first.
    pub fn list_medicines(&self) -> Result<Vec<FfiMedicine>, PillboxError> {
        Ok(self.snapshot()?.into_iter().map(|m| m.into()).collect())
    }

    /// Search medicines by name.
    pub fn search_medicines(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiMedicine>, PillboxError> {
        let db = self.db.lock()?;
        let medicines = db.search_medicines(&query, limit as usize)?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Filter medicines whose name contains `query`, newest first.
    pub fn filter_by_name(&self, query: String) -> Result<Vec<FfiMedicine>, PillboxError> {
        let medicines = self.snapshot()?;
        Ok(inventory::filter_by_name(&medicines, &query)
            .into_iter()
            .cloned()
            .map(|m| m.into())
            .collect())
    }

    /// Search medicines by name, uses or category.
    pub fn search_by_keyword(&self, query: String) -> Result<Vec<FfiMedicine>, PillboxError> {
        let medicines = self.snapshot()?;
        Ok(inventory::search(&medicines, &query)
            .into_iter()
            .cloned()
            .map(|m| m.into())
            .collect())
    }

    /// Set the remaining quantity.
    pub fn update_quantity(&self, id: String, quantity: u32) -> Result<(), PillboxError> {
        let db = self.db.lock()?;
        if !db.update_quantity(&id, quantity)? {
            return Err(PillboxError::NotFound(id));
        }
        Ok(())
    }

    /// Correct a medicine's expiry date.
    pub fn correct_expiry(&self, id: String, expiry_date: String) -> Result<(), PillboxError> {
        let expiry = ExpiryDate::parse(&expiry_date)?;
        let db = self.db.lock()?;
        if !db.correct_expiry(&id, expiry)? {
            return Err(PillboxError::NotFound(id));
        }
        Ok(())
    }

    /// Replace a medicine with a fresh pack, keeping its ID.
    pub fn replace_medicine(
        &self,
        id: String,
        replacement: FfiReplacement,
    ) -> Result<FfiMedicine, PillboxError> {
        ExpiryDate::parse(&replacement.expiry_date)?;
        let mut db = self.db.lock()?;
        let updated = db.replace_medicine(&id, &replacement.into())?;
        Ok(updated.into())
    }

    /// Delete a medicine. Returns false if it did not exist.
    pub fn delete_medicine(&self, id: String) -> Result<bool, PillboxError> {
        let db = self.db.lock()?;
        Ok(db.delete_medicine(&id)?)
    }

    // =========================================================================
    // Expiry Operations
    // =========================================================================

    /// Bucket every medicine by expiry status.
    ///
    /// `today` (YYYY-MM-DD) defaults to the local calendar date.
    pub fn expiry_overview(&self, today: Option<String>) -> Result<FfiExpiryOverview, PillboxError> {
        let today = resolve_today(today)?;
        let result = partition(self.snapshot()?, today, &self.policy);
        Ok(result.into())
    }

    /// All readable medicines, most urgent first.
    pub fn urgency_list(
        &self,
        today: Option<String>,
    ) -> Result<Vec<FfiClassifiedMedicine>, PillboxError> {
        let today = resolve_today(today)?;
        let order = sort_by_urgency(self.snapshot()?, today, &self.policy);
        Ok(order.entries.into_iter().map(|e| e.into()).collect())
    }

    /// Alerts for expired and expiring-soon medicines.
    pub fn expiry_alerts(&self, today: Option<String>) -> Result<Vec<FfiExpiryAlert>, PillboxError> {
        let today = resolve_today(today)?;
        let alerts = expiry::collect_alerts(self.snapshot()?, today, &self.policy);
        Ok(alerts.into_iter().map(|a| a.into()).collect())
    }

    /// Match recommended medicine names to usable stock.
    pub fn match_recommendations(
        &self,
        recommended: Vec<String>,
        today: Option<String>,
    ) -> Result<Vec<FfiRecommendationMatch>, PillboxError> {
        let today = resolve_today(today)?;
        let medicines = self.snapshot()?;
        let matches = recommend::match_recommendations(&recommended, &medicines, today, &self.policy);
        Ok(matches.into_iter().map(|m| m.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe expiry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiExpiryStatus {
    Expired,
    ExpiringSoon,
    Valid,
}

impl From<ExpiryStatus> for FfiExpiryStatus {
    fn from(status: ExpiryStatus) -> Self {
        match status {
            ExpiryStatus::Expired => FfiExpiryStatus::Expired,
            ExpiryStatus::ExpiringSoon => FfiExpiryStatus::ExpiringSoon,
            ExpiryStatus::Valid => FfiExpiryStatus::Valid,
        }
    }
}

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub expiry_date: Option<String>,
    pub quantity: u32,
    pub frequency: Option<String>,
    pub dosage: Option<String>,
    pub category: Option<String>,
    pub uses: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MedicineRecord> for FfiMedicine {
    fn from(medicine: MedicineRecord) -> Self {
        Self {
            id: medicine.id,
            name: medicine.name,
            expiry_date: medicine.expiry_date,
            quantity: medicine.quantity,
            frequency: medicine.frequency,
            dosage: medicine.dosage,
            category: medicine.category,
            uses: medicine.uses,
            notes: medicine.notes,
            created_at: medicine.created_at,
            updated_at: medicine.updated_at,
        }
    }
}

/// FFI-safe input for a new medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewMedicine {
    pub name: String,
    pub expiry_date: Option<String>,
    pub quantity: u32,
    pub frequency: Option<String>,
    pub dosage: Option<String>,
    pub category: Option<String>,
    pub uses: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiNewMedicine> for MedicineRecord {
    fn from(input: FfiNewMedicine) -> Self {
        let mut record = MedicineRecord::new(input.name.trim().to_string(), input.expiry_date, input.quantity);
        record.frequency = input.frequency;
        record.dosage = input.dosage;
        record.category = input.category;
        record.uses = input.uses;
        record.notes = input.notes;
        record
    }
}

/// FFI-safe replacement.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReplacement {
    pub name: String,
    pub expiry_date: String,
    pub quantity: u32,
}

impl From<FfiReplacement> for MedicineReplacement {
    fn from(replacement: FfiReplacement) -> Self {
        MedicineReplacement {
            name: replacement.name,
            expiry_date: replacement.expiry_date,
            quantity: replacement.quantity,
        }
    }
}

/// FFI-safe medicine with its derived status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClassifiedMedicine {
    pub medicine: FfiMedicine,
    pub status: FfiExpiryStatus,
}

impl From<expiry::ClassifiedMedicine> for FfiClassifiedMedicine {
    fn from(entry: expiry::ClassifiedMedicine) -> Self {
        Self {
            medicine: entry.record.into(),
            status: entry.status.into(),
        }
    }
}

/// FFI-safe record that could not be classified.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRejectedMedicine {
    pub medicine: FfiMedicine,
    pub reason: String,
}

impl From<expiry::RejectedRecord> for FfiRejectedMedicine {
    fn from(rejected: expiry::RejectedRecord) -> Self {
        Self {
            medicine: rejected.record.into(),
            reason: rejected.error.to_string(),
        }
    }
}

/// FFI-safe per-status counts.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExpirySummary {
    pub expired: u32,
    pub expiring_soon: u32,
    pub valid: u32,
    pub invalid: u32,
    pub total: u32,
}

impl From<ExpirySummary> for FfiExpirySummary {
    fn from(summary: ExpirySummary) -> Self {
        Self {
            expired: saturating_count(summary.expired),
            expiring_soon: saturating_count(summary.expiring_soon),
            valid: saturating_count(summary.valid),
            invalid: saturating_count(summary.invalid),
            total: saturating_count(summary.total),
        }
    }
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// FFI-safe expiry buckets.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExpiryOverview {
    pub summary: FfiExpirySummary,
    pub expired: Vec<FfiMedicine>,
    pub expiring_soon: Vec<FfiMedicine>,
    pub valid: Vec<FfiMedicine>,
    pub rejected: Vec<FfiRejectedMedicine>,
}

impl From<Partition> for FfiExpiryOverview {
    fn from(partition: Partition) -> Self {
        Self {
            summary: partition.summary().into(),
            expired: partition.expired.into_iter().map(|m| m.into()).collect(),
            expiring_soon: partition.expiring_soon.into_iter().map(|m| m.into()).collect(),
            valid: partition.valid.into_iter().map(|m| m.into()).collect(),
            rejected: partition.rejected.into_iter().map(|r| r.into()).collect(),
        }
    }
}

/// FFI-safe expiry alert.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExpiryAlert {
    pub medicine_id: String,
    pub name: String,
    pub expiry_date: String,
    pub status: FfiExpiryStatus,
    pub days_remaining: i64,
    pub quantity: u32,
    pub message: String,
}

impl From<ExpiryAlert> for FfiExpiryAlert {
    fn from(alert: ExpiryAlert) -> Self {
        let message = alert.message();
        Self {
            medicine_id: alert.medicine_id,
            name: alert.name,
            expiry_date: alert.expiry_date.to_string(),
            status: alert.status.into(),
            days_remaining: alert.days_remaining,
            quantity: alert.quantity,
            message,
        }
    }
}

/// FFI-safe recommendation match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendationMatch {
    pub recommended: String,
    pub medicine: Option<FfiMedicine>,
    pub status: Option<FfiExpiryStatus>,
    pub confidence: f64,
}

impl From<RecommendationMatch> for FfiRecommendationMatch {
    fn from(m: RecommendationMatch) -> Self {
        Self {
            recommended: m.recommended,
            medicine: m.medicine.map(|med| med.into()),
            status: m.status.map(|s| s.into()),
            confidence: m.confidence,
        }
    }
}
