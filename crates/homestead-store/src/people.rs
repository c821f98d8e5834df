//! CRUD operations for [`Person`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{ensure_id, Database};
use crate::error::Result;
use crate::models::Person;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new person.  The identity on the way in is ignored; the
    /// store-assigned id is returned.
    pub fn insert_person(&self, person: &Person) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO person (first_name, last_name, email, phone_number)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                person.first_name,
                person.last_name,
                person.email,
                person.phone_number,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single person by id.
    pub fn find_person(&self, person_id: i64) -> Result<Option<Person>> {
        let conn = self.connect()?;
        let person = conn
            .query_row(
                "SELECT person_id, first_name, last_name, email, phone_number
                 FROM person
                 WHERE person_id = ?1",
                params![person_id],
                row_to_person,
            )
            .optional()?;
        Ok(person)
    }

    /// List all people, ordered by id.
    pub fn list_people(&self) -> Result<Vec<Person>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT person_id, first_name, last_name, email, phone_number
             FROM person
             ORDER BY person_id",
        )?;

        let rows = stmt.query_map([], row_to_person)?;

        let mut people = Vec::new();
        for row in rows {
            people.push(row?);
        }
        Ok(people)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace every mutable column.  A missing identity is a silent no-op;
    /// callers that need the distinction check [`Database::find_person`]
    /// first.
    pub fn update_person(&self, person: &Person) -> Result<()> {
        ensure_id(person.person_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE person
             SET first_name = ?1, last_name = ?2, email = ?3, phone_number = ?4
             WHERE person_id = ?5",
            params![
                person.first_name,
                person.last_name,
                person.email,
                person.phone_number,
                person.person_id,
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a person by id.  Returns `true` if a row was deleted.
    ///
    /// The store's foreign keys reject the delete while any relation still
    /// references the person; [`Database::blockers_for`] reports which ones
    /// would, ahead of time.
    pub fn delete_person(&self, person_id: i64) -> Result<bool> {
        ensure_id(person_id)?;
        let conn = self.connect()?;
        let affected = conn.execute(
            "DELETE FROM person WHERE person_id = ?1",
            params![person_id],
        )?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Person`].
fn row_to_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        person_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
    })
}
