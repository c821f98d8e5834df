//! CRUD operations for [`Role`] records and the person/role assignment
//! table.
//!
//! Roles are stored and assignable; nothing in this crate evaluates the
//! permission flags.

use rusqlite::{params, OptionalExtension};

use crate::database::{ensure_id, Database};
use crate::error::Result;
use crate::models::Role;

impl Database {
    /// Insert a new role.  The identity on the way in is ignored; the
    /// store-assigned id is returned.
    pub fn insert_role(&self, role: &Role) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO role (role_type, has_full_access, can_post, can_authorize_sale)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                role.role_type,
                role.has_full_access as i32,
                role.can_post as i32,
                role.can_authorize_sale as i32,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a single role by id.
    pub fn find_role(&self, role_id: i64) -> Result<Option<Role>> {
        let conn = self.connect()?;
        let role = conn
            .query_row(
                "SELECT role_id, role_type, has_full_access, can_post, can_authorize_sale
                 FROM role
                 WHERE role_id = ?1",
                params![role_id],
                row_to_role,
            )
            .optional()?;
        Ok(role)
    }

    /// List all roles, ordered by id.
    pub fn list_roles(&self) -> Result<Vec<Role>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT role_id, role_type, has_full_access, can_post, can_authorize_sale
             FROM role
             ORDER BY role_id",
        )?;

        let rows = stmt.query_map([], row_to_role)?;

        let mut roles = Vec::new();
        for row in rows {
            roles.push(row?);
        }
        Ok(roles)
    }

    /// Replace every mutable column.  Missing identity is a no-op.
    pub fn update_role(&self, role: &Role) -> Result<()> {
        ensure_id(role.role_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE role
             SET role_type = ?1, has_full_access = ?2, can_post = ?3, can_authorize_sale = ?4
             WHERE role_id = ?5",
            params![
                role.role_type,
                role.has_full_access as i32,
                role.can_post as i32,
                role.can_authorize_sale as i32,
                role.role_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a role by id.  Returns `true` if a row was deleted.  Fails
    /// while any person still holds the role.
    pub fn delete_role(&self, role_id: i64) -> Result<bool> {
        ensure_id(role_id)?;
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM role WHERE role_id = ?1", params![role_id])?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------

    /// Assign a role to a person.  Both must exist; assigning the same role
    /// twice is a constraint violation.
    pub fn assign_role(&self, person_id: i64, role_id: i64) -> Result<()> {
        ensure_id(person_id)?;
        ensure_id(role_id)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO person_roles (person_id, role_id)
             VALUES (?1, ?2)",
            params![person_id, role_id],
        )?;
        Ok(())
    }

    /// Remove an assignment.  Returns `true` if a row was deleted.
    pub fn revoke_role(&self, person_id: i64, role_id: i64) -> Result<bool> {
        ensure_id(person_id)?;
        ensure_id(role_id)?;
        let conn = self.connect()?;
        let affected = conn.execute(
            "DELETE FROM person_roles
             WHERE person_id = ?1 AND role_id = ?2",
            params![person_id, role_id],
        )?;
        Ok(affected > 0)
    }

    /// List the roles held by a person, ordered by role id.
    pub fn roles_for_person(&self, person_id: i64) -> Result<Vec<Role>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT r.role_id, r.role_type, r.has_full_access, r.can_post, r.can_authorize_sale
             FROM role r
             INNER JOIN person_roles pr ON pr.role_id = r.role_id
             WHERE pr.person_id = ?1
             ORDER BY r.role_id",
        )?;

        let rows = stmt.query_map(params![person_id], row_to_role)?;

        let mut roles = Vec::new();
        for row in rows {
            roles.push(row?);
        }
        Ok(roles)
    }
}

/// Map a `rusqlite::Row` to a [`Role`].
fn row_to_role(row: &rusqlite::Row<'_>) -> rusqlite::Result<Role> {
    let has_full_access: i32 = row.get(2)?;
    let can_post: i32 = row.get(3)?;
    let can_authorize_sale: i32 = row.get(4)?;

    Ok(Role {
        role_id: row.get(0)?,
        role_type: row.get(1)?,
        has_full_access: has_full_access != 0,
        can_post: can_post != 0,
        can_authorize_sale: can_authorize_sale != 0,
    })
}

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::models::Role;
    use crate::testutil::{open_temp, seed_person};

    fn broker() -> Role {
        Role {
            role_id: 0,
            role_type: "broker".to_string(),
            has_full_access: false,
            can_post: true,
            can_authorize_sale: true,
        }
    }

    #[test]
    fn insert_find_round_trip() {
        let (_dir, db) = open_temp();

        let id = db.insert_role(&broker()).unwrap();
        let found = db.find_role(id).unwrap().expect("role exists");
        assert_eq!(
            found,
            Role {
                role_id: id,
                ..broker()
            }
        );
    }

    #[test]
    fn assign_and_revoke() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Elena", "Ruseva");
        let role = db.insert_role(&broker()).unwrap();

        db.assign_role(person, role).unwrap();
        let held = db.roles_for_person(person).unwrap();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].role_type, "broker");

        assert!(db.revoke_role(person, role).unwrap());
        assert!(db.roles_for_person(person).unwrap().is_empty());
        assert!(!db.revoke_role(person, role).unwrap());
    }

    #[test]
    fn double_assignment_is_a_constraint_violation() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Elena", "Ruseva");
        let role = db.insert_role(&broker()).unwrap();

        db.assign_role(person, role).unwrap();
        let err = db.assign_role(person, role).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[test]
    fn assigned_role_cannot_be_deleted() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Elena", "Ruseva");
        let role = db.insert_role(&broker()).unwrap();
        db.assign_role(person, role).unwrap();

        let err = db.delete_role(role).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        db.revoke_role(person, role).unwrap();
        assert!(db.delete_role(role).unwrap());
    }

    #[test]
    fn update_replaces_flags() {
        let (_dir, db) = open_temp();

        let id = db.insert_role(&broker()).unwrap();
        db.update_role(&Role {
            role_id: id,
            role_type: "admin".to_string(),
            has_full_access: true,
            can_post: true,
            can_authorize_sale: true,
        })
        .unwrap();

        let found = db.find_role(id).unwrap().unwrap();
        assert_eq!(found.role_type, "admin");
        assert!(found.has_full_access);
    }
}
