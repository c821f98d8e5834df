//! CRUD operations for [`PropertyOwner`] links.
//!
//! The row identity is the (person, property) pair itself.  "Update" means
//! retargeting the pair; it runs as one UPDATE statement so no transient
//! state with both pairs, or neither, is ever visible.

use rusqlite::{params, OptionalExtension};

use crate::database::{ensure_id, Database};
use crate::error::Result;
use crate::models::PropertyOwner;

impl Database {
    /// Insert an ownership link.  Both sides must exist; a duplicate pair is
    /// rejected by the composite primary key.
    pub fn insert_owner_link(&self, link: &PropertyOwner) -> Result<()> {
        ensure_id(link.person_id)?;
        ensure_id(link.property_id)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO property_owner (person_id, property_id)
             VALUES (?1, ?2)",
            params![link.person_id, link.property_id],
        )?;
        Ok(())
    }

    /// Fetch a link by its pair identity.
    pub fn find_owner_link(
        &self,
        person_id: i64,
        property_id: i64,
    ) -> Result<Option<PropertyOwner>> {
        let conn = self.connect()?;
        let link = conn
            .query_row(
                "SELECT person_id, property_id
                 FROM property_owner
                 WHERE person_id = ?1 AND property_id = ?2",
                params![person_id, property_id],
                row_to_owner_link,
            )
            .optional()?;
        Ok(link)
    }

    /// List all ownership links, ordered by the pair.
    pub fn list_owner_links(&self) -> Result<Vec<PropertyOwner>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT person_id, property_id
             FROM property_owner
             ORDER BY person_id, property_id",
        )?;

        let rows = stmt.query_map([], row_to_owner_link)?;

        let mut links = Vec::new();
        for row in rows {
            links.push(row?);
        }
        Ok(links)
    }

    /// Retarget an existing pair to `new_link`.
    ///
    /// Single statement: the old pair is replaced atomically, never leaving
    /// the old pair alive alongside the new one.  Retargeting onto a pair
    /// that already exists is a constraint violation.
    pub fn update_owner_link(
        &self,
        old_person_id: i64,
        old_property_id: i64,
        new_link: &PropertyOwner,
    ) -> Result<()> {
        ensure_id(old_person_id)?;
        ensure_id(old_property_id)?;
        ensure_id(new_link.person_id)?;
        ensure_id(new_link.property_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE property_owner
             SET person_id = ?1, property_id = ?2
             WHERE person_id = ?3 AND property_id = ?4",
            params![
                new_link.person_id,
                new_link.property_id,
                old_person_id,
                old_property_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a link by its pair.  Returns `true` if a row was deleted.
    pub fn delete_owner_link(&self, person_id: i64, property_id: i64) -> Result<bool> {
        ensure_id(person_id)?;
        ensure_id(property_id)?;
        let conn = self.connect()?;
        let affected = conn.execute(
            "DELETE FROM property_owner
             WHERE person_id = ?1 AND property_id = ?2",
            params![person_id, property_id],
        )?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`PropertyOwner`].
fn row_to_owner_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<PropertyOwner> {
    Ok(PropertyOwner {
        person_id: row.get(0)?,
        property_id: row.get(1)?,
    })
}
