//! Medicine inventory database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::expiry::ExpiryDate;
use crate::models::{MedicineRecord, MedicineReplacement};

const MEDICINE_COLUMNS: &str = r#"
    id, name, expiry_date, quantity, frequency, dosage,
    category, uses, notes, created_at, updated_at
"#;

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<MedicineRecord> {
    Ok(MedicineRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        expiry_date: row.get(2)?,
        quantity: row.get(3)?,
        frequency: row.get(4)?,
        dosage: row.get(5)?,
        category: row.get(6)?,
        uses: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Normalize an expiry date to `YYYY-MM-DD` before it is written.
fn normalize_expiry(raw: &str) -> DbResult<String> {
    ExpiryDate::parse(raw)
        .map(ExpiryDate::to_storage_string)
        .map_err(|e| DbError::Constraint(e.to_string()))
}

/// Escape LIKE wildcards in user input.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Database {
    /// Insert a new medicine.
    ///
    /// A present expiry date must be readable; it is stored as `YYYY-MM-DD`.
    pub fn insert_medicine(&self, medicine: &MedicineRecord) -> DbResult<()> {
        let expiry_date = medicine
            .expiry_date
            .as_deref()
            .map(normalize_expiry)
            .transpose()?;

        self.conn.execute(
            r#"
            INSERT INTO medicines (
                id, name, expiry_date, quantity, frequency, dosage,
                category, uses, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                medicine.id,
                medicine.name,
                expiry_date,
                medicine.quantity,
                medicine.frequency,
                medicine.dosage,
                medicine.category,
                medicine.uses,
                medicine.notes,
                medicine.created_at,
                medicine.updated_at,
            ],
        )?;
        tracing::debug!(medicine_id = %medicine.id, name = %medicine.name, "Inserted medicine");
        Ok(())
    }

    /// Get a medicine by ID.
    pub fn get_medicine(&self, id: &str) -> DbResult<Option<MedicineRecord>> {
        let sql = format!("SELECT {} FROM medicines WHERE id = ?", MEDICINE_COLUMNS);
        self.conn
            .query_row(&sql, [id], medicine_from_row)
            .optional()
            .map_err(Into::into)
    }

    /// List all medicines, newest first.
    pub fn list_medicines(&self) -> DbResult<Vec<MedicineRecord>> {
        let sql = format!(
            "SELECT {} FROM medicines ORDER BY created_at DESC, rowid DESC",
            MEDICINE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], medicine_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search medicines by name (case-insensitive substring).
    pub fn search_medicines(&self, query: &str, limit: usize) -> DbResult<Vec<MedicineRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM medicines
            WHERE name LIKE ? ESCAPE '\'
            ORDER BY name
            LIMIT ?
            "#,
            MEDICINE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![like_pattern(query.trim()), limit as i64],
            medicine_from_row,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Set the remaining quantity.
    pub fn update_quantity(&self, id: &str, quantity: u32) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicines SET
                quantity = ?2,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
            WHERE id = ?1
            "#,
            params![id, quantity],
        )?;
        Ok(rows_affected > 0)
    }

    /// Correct the expiry date.
    pub fn correct_expiry(&self, id: &str, expiry: ExpiryDate) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicines SET
                expiry_date = ?2,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
            WHERE id = ?1
            "#,
            params![id, expiry.to_storage_string()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Replace a medicine with a fresh pack, keeping its ID.
    ///
    /// Name, expiry and quantity change together or not at all.
    pub fn replace_medicine(
        &mut self,
        id: &str,
        replacement: &MedicineReplacement,
    ) -> DbResult<MedicineRecord> {
        let expiry_date = normalize_expiry(&replacement.expiry_date)?;

        let tx = self.transaction()?;
        let rows_affected = tx.execute(
            r#"
            UPDATE medicines SET
                name = ?2,
                expiry_date = ?3,
                quantity = ?4,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
            WHERE id = ?1
            "#,
            params![id, replacement.name, expiry_date, replacement.quantity],
        )?;
        if rows_affected == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }

        let sql = format!("SELECT {} FROM medicines WHERE id = ?", MEDICINE_COLUMNS);
        let updated = tx.query_row(&sql, [id], medicine_from_row)?;
        tx.commit()?;

        tracing::info!(medicine_id = %id, name = %updated.name, "Replaced medicine");
        Ok(updated)
    }

    /// Delete a medicine.
    pub fn delete_medicine(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
