//! CRUD operations for [`Preference`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{ensure_id, Database};
use crate::error::Result;
use crate::models::Preference;

impl Database {
    /// Insert a new preference.  The identity on the way in is ignored; the
    /// store-assigned id is returned.  The referenced client must exist.
    pub fn insert_preference(&self, preference: &Preference) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO preferences (client_id, preference_type)
             VALUES (?1, ?2)",
            params![preference.client_id, preference.preference_type],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a single preference by id.
    pub fn find_preference(&self, preference_id: i64) -> Result<Option<Preference>> {
        let conn = self.connect()?;
        let preference = conn
            .query_row(
                "SELECT preference_id, client_id, preference_type
                 FROM preferences
                 WHERE preference_id = ?1",
                params![preference_id],
                row_to_preference,
            )
            .optional()?;
        Ok(preference)
    }

    /// List all preferences, ordered by id.
    pub fn list_preferences(&self) -> Result<Vec<Preference>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT preference_id, client_id, preference_type
             FROM preferences
             ORDER BY preference_id",
        )?;

        let rows = stmt.query_map([], row_to_preference)?;

        let mut preferences = Vec::new();
        for row in rows {
            preferences.push(row?);
        }
        Ok(preferences)
    }

    /// List the preferences of one client, ordered by id.
    pub fn list_preferences_for_client(&self, client_id: i64) -> Result<Vec<Preference>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT preference_id, client_id, preference_type
             FROM preferences
             WHERE client_id = ?1
             ORDER BY preference_id",
        )?;

        let rows = stmt.query_map(params![client_id], row_to_preference)?;

        let mut preferences = Vec::new();
        for row in rows {
            preferences.push(row?);
        }
        Ok(preferences)
    }

    /// Replace every mutable column.  Missing identity is a no-op.
    pub fn update_preference(&self, preference: &Preference) -> Result<()> {
        ensure_id(preference.preference_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE preferences
             SET client_id = ?1, preference_type = ?2
             WHERE preference_id = ?3",
            params![
                preference.client_id,
                preference.preference_type,
                preference.preference_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a preference by id.  Returns `true` if a row was deleted.
    pub fn delete_preference(&self, preference_id: i64) -> Result<bool> {
        ensure_id(preference_id)?;
        let conn = self.connect()?;
        let affected = conn.execute(
            "DELETE FROM preferences WHERE preference_id = ?1",
            params![preference_id],
        )?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Preference`].
fn row_to_preference(row: &rusqlite::Row<'_>) -> rusqlite::Result<Preference> {
    Ok(Preference {
        preference_id: row.get(0)?,
        client_id: row.get(1)?,
        preference_type: row.get(2)?,
    })
}
