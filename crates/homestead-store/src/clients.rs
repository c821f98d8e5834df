//! CRUD operations for [`Client`] records.
//!
//! Same identity-sharing rule as agents: the person id must already exist,
//! enforced by the store's foreign key.

use rusqlite::{params, OptionalExtension};

use crate::database::{decimal_column, ensure_id, Database};
use crate::error::Result;
use crate::models::Client;

impl Database {
    /// Insert a client row for an existing person.
    pub fn insert_client(&self, client: &Client) -> Result<()> {
        ensure_id(client.person_id)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO client (person_id, budget, area_interested_in)
             VALUES (?1, ?2, ?3)",
            params![
                client.person_id,
                client.budget.map(|d| d.to_string()),
                client.area_interested_in,
            ],
        )?;
        Ok(())
    }

    /// Fetch a single client by person id.
    pub fn find_client(&self, person_id: i64) -> Result<Option<Client>> {
        let conn = self.connect()?;
        let client = conn
            .query_row(
                "SELECT person_id, budget, area_interested_in
                 FROM client
                 WHERE person_id = ?1",
                params![person_id],
                row_to_client,
            )
            .optional()?;
        Ok(client)
    }

    /// List all clients, ordered by person id.
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT person_id, budget, area_interested_in
             FROM client
             ORDER BY person_id",
        )?;

        let rows = stmt.query_map([], row_to_client)?;

        let mut clients = Vec::new();
        for row in rows {
            clients.push(row?);
        }
        Ok(clients)
    }

    /// Replace the client's mutable columns.  Missing identity is a no-op.
    pub fn update_client(&self, client: &Client) -> Result<()> {
        ensure_id(client.person_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE client
             SET budget = ?1, area_interested_in = ?2
             WHERE person_id = ?3",
            params![
                client.budget.map(|d| d.to_string()),
                client.area_interested_in,
                client.person_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a client row.  Returns `true` if a row was deleted.
    pub fn delete_client(&self, person_id: i64) -> Result<bool> {
        ensure_id(person_id)?;
        let conn = self.connect()?;
        let affected =
            conn.execute("DELETE FROM client WHERE person_id = ?1", params![person_id])?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Client`].
fn row_to_client(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    let budget: Option<String> = row.get(1)?;

    Ok(Client {
        person_id: row.get(0)?,
        budget: decimal_column(1, budget)?,
        area_interested_in: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::models::Client;
    use crate::testutil::{dec, open_temp, seed_person};

    #[test]
    fn insert_find_round_trip() {
        let (_dir, db) = open_temp();

        let person_id = seed_person(&db, "Mira", "Petrova");
        let client = Client {
            person_id,
            budget: Some(dec("185000.00")),
            area_interested_in: Some("Lozenets".to_string()),
        };
        db.insert_client(&client).unwrap();

        let found = db.find_client(person_id).unwrap().expect("client exists");
        assert_eq!(found, client);
    }

    #[test]
    fn nullable_fields_round_trip_absent() {
        let (_dir, db) = open_temp();

        let person_id = seed_person(&db, "Mira", "Petrova");
        db.insert_client(&Client {
            person_id,
            budget: None,
            area_interested_in: None,
        })
        .unwrap();

        let found = db.find_client(person_id).unwrap().unwrap();
        assert_eq!(found.budget, None);
        assert_eq!(found.area_interested_in, None);
    }

    #[test]
    fn insert_for_unknown_person_is_a_constraint_violation() {
        let (_dir, db) = open_temp();

        let err = db
            .insert_client(&Client {
                person_id: 555,
                budget: None,
                area_interested_in: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[test]
    fn update_clears_nullables() {
        let (_dir, db) = open_temp();

        let person_id = seed_person(&db, "Mira", "Petrova");
        db.insert_client(&Client {
            person_id,
            budget: Some(dec("90000")),
            area_interested_in: Some("Centre".to_string()),
        })
        .unwrap();

        db.update_client(&Client {
            person_id,
            budget: None,
            area_interested_in: None,
        })
        .unwrap();

        let found = db.find_client(person_id).unwrap().unwrap();
        assert_eq!(found.budget, None);
        assert_eq!(found.area_interested_in, None);
    }

    #[test]
    fn delete_rejects_non_positive_identity() {
        let (_dir, db) = open_temp();

        let err = db.delete_client(-1).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
