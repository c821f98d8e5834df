//! CRUD operations for [`Property`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{decimal_column, ensure_id, property_type_value, Database};
use crate::error::Result;
use crate::models::Property;

impl Database {
    /// Insert a new property.  The identity on the way in is ignored; the
    /// store-assigned id is returned.
    pub fn insert_property(&self, property: &Property) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO property
                 (price, square_meters, latitude, longitude, city, property_type, owner_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                property.price.map(|d| d.to_string()),
                property.square_meters.map(|d| d.to_string()),
                property.latitude,
                property.longitude,
                property.city,
                property.property_type.as_str(),
                property.owner_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a single property by id.
    pub fn find_property(&self, property_id: i64) -> Result<Option<Property>> {
        let conn = self.connect()?;
        let property = conn
            .query_row(
                "SELECT property_id, price, square_meters, latitude, longitude, city,
                        property_type, owner_id
                 FROM property
                 WHERE property_id = ?1",
                params![property_id],
                row_to_property,
            )
            .optional()?;
        Ok(property)
    }

    /// List all properties, ordered by id.
    pub fn list_properties(&self) -> Result<Vec<Property>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT property_id, price, square_meters, latitude, longitude, city,
                    property_type, owner_id
             FROM property
             ORDER BY property_id",
        )?;

        let rows = stmt.query_map([], row_to_property)?;

        let mut properties = Vec::new();
        for row in rows {
            properties.push(row?);
        }
        Ok(properties)
    }

    /// Replace every mutable column.  Missing identity is a no-op.
    pub fn update_property(&self, property: &Property) -> Result<()> {
        ensure_id(property.property_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE property
             SET price = ?1, square_meters = ?2, latitude = ?3, longitude = ?4,
                 city = ?5, property_type = ?6, owner_id = ?7
             WHERE property_id = ?8",
            params![
                property.price.map(|d| d.to_string()),
                property.square_meters.map(|d| d.to_string()),
                property.latitude,
                property.longitude,
                property.city,
                property.property_type.as_str(),
                property.owner_id,
                property.property_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a property by id.  Returns `true` if a row was deleted.
    pub fn delete_property(&self, property_id: i64) -> Result<bool> {
        ensure_id(property_id)?;
        let conn = self.connect()?;
        let affected = conn.execute(
            "DELETE FROM property WHERE property_id = ?1",
            params![property_id],
        )?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Property`].
fn row_to_property(row: &rusqlite::Row<'_>) -> rusqlite::Result<Property> {
    let price: Option<String> = row.get(1)?;
    let square_meters: Option<String> = row.get(2)?;
    let type_str: String = row.get(6)?;

    Ok(Property {
        property_id: row.get(0)?,
        price: decimal_column(1, price)?,
        square_meters: decimal_column(2, square_meters)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        city: row.get(5)?,
        property_type: property_type_value(6, type_str)?,
        owner_id: row.get(7)?,
    })
}
