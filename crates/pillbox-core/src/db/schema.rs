//! SQLite schema definition.

/// Complete database schema for pillbox.
///
/// Expiry status is never stored; it is derived at read time.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medicines
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    expiry_date TEXT,                            -- YYYY-MM-DD, NULL if unknown
    quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    frequency TEXT,
    dosage TEXT,
    category TEXT,
    uses TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(name);
CREATE INDEX IF NOT EXISTS idx_medicines_expiry ON medicines(expiry_date);
CREATE INDEX IF NOT EXISTS idx_medicines_created ON medicines(created_at);
"#;
