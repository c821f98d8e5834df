//! CRUD operations for [`Listing`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{ensure_id, Database};
use crate::error::Result;
use crate::models::Listing;

impl Database {
    /// Insert a new listing.  The identity on the way in is ignored; the
    /// store-assigned id is returned.
    pub fn insert_listing(&self, listing: &Listing) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO listing (type_of_listing, description, notes)
             VALUES (?1, ?2, ?3)",
            params![listing.type_of_listing, listing.description, listing.notes],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a single listing by id.
    pub fn find_listing(&self, listing_id: i64) -> Result<Option<Listing>> {
        let conn = self.connect()?;
        let listing = conn
            .query_row(
                "SELECT listing_id, type_of_listing, description, notes
                 FROM listing
                 WHERE listing_id = ?1",
                params![listing_id],
                row_to_listing,
            )
            .optional()?;
        Ok(listing)
    }

    /// List all listings, ordered by id.
    pub fn list_listings(&self) -> Result<Vec<Listing>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT listing_id, type_of_listing, description, notes
             FROM listing
             ORDER BY listing_id",
        )?;

        let rows = stmt.query_map([], row_to_listing)?;

        let mut listings = Vec::new();
        for row in rows {
            listings.push(row?);
        }
        Ok(listings)
    }

    /// Replace every mutable column.  Missing identity is a no-op.
    pub fn update_listing(&self, listing: &Listing) -> Result<()> {
        ensure_id(listing.listing_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE listing
             SET type_of_listing = ?1, description = ?2, notes = ?3
             WHERE listing_id = ?4",
            params![
                listing.type_of_listing,
                listing.description,
                listing.notes,
                listing.listing_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a listing by id.  Returns `true` if a row was deleted.
    pub fn delete_listing(&self, listing_id: i64) -> Result<bool> {
        ensure_id(listing_id)?;
        let conn = self.connect()?;
        let affected = conn.execute(
            "DELETE FROM listing WHERE listing_id = ?1",
            params![listing_id],
        )?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Listing`].
fn row_to_listing(row: &rusqlite::Row<'_>) -> rusqlite::Result<Listing> {
    Ok(Listing {
        listing_id: row.get(0)?,
        type_of_listing: row.get(1)?,
        description: row.get(2)?,
        notes: row.get(3)?,
    })
}
