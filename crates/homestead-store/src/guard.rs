//! Pre-delete referential-integrity probe for people.
//!
//! [`Database::blockers_for`] is advisory: it exists so a caller can explain
//! *why* a delete would fail before attempting it.  The delete statement
//! itself remains the authoritative integrity gate; a writer racing in
//! between simply surfaces as [`crate::StoreError::Constraint`] from the
//! delete.

use std::collections::BTreeSet;
use std::fmt;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Result;

/// A relation holding at least one row that references a person, preventing
/// that person's deletion.  Variant order is probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Blocker {
    /// A `client` row shares the person identity.
    Client,
    /// An `agent` row shares the person identity.
    Agent,
    /// `property.owner_id` points at the person.
    PropertyOwnerId,
    /// `successful_deals.agent_id` points at the person.
    DealAgent,
    /// `successful_deals.client_id` points at the person.
    DealClient,
    /// A `person_roles` assignment names the person.
    PersonRole,
    /// A `property_owner` link names the person.
    OwnershipLink,
}

impl Blocker {
    /// Stable relation label, suitable for logs and operator messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Blocker::Client => "client",
            Blocker::Agent => "agent",
            Blocker::PropertyOwnerId => "property.owner_id",
            Blocker::DealAgent => "successful_deals.agent_id",
            Blocker::DealClient => "successful_deals.client_id",
            Blocker::PersonRole => "person_roles",
            Blocker::OwnershipLink => "property_owner",
        }
    }
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PROBES: &[(Blocker, &str)] = &[
    (Blocker::Client, "SELECT 1 FROM client WHERE person_id = ?1"),
    (Blocker::Agent, "SELECT 1 FROM agent WHERE person_id = ?1"),
    (
        Blocker::PropertyOwnerId,
        "SELECT 1 FROM property WHERE owner_id = ?1",
    ),
    (
        Blocker::DealAgent,
        "SELECT 1 FROM successful_deals WHERE agent_id = ?1",
    ),
    (
        Blocker::DealClient,
        "SELECT 1 FROM successful_deals WHERE client_id = ?1",
    ),
    (
        Blocker::PersonRole,
        "SELECT 1 FROM person_roles WHERE person_id = ?1",
    ),
    (
        Blocker::OwnershipLink,
        "SELECT 1 FROM property_owner WHERE person_id = ?1",
    ),
];

impl Database {
    /// Probe every relation that may reference `person_id`.
    ///
    /// An empty set means nothing blocks the delete right now.  The caller
    /// decides whether to proceed or to present the set to the operator.
    pub fn blockers_for(&self, person_id: i64) -> Result<BTreeSet<Blocker>> {
        let conn = self.connect()?;
        let mut blockers = BTreeSet::new();
        for (blocker, sql) in PROBES {
            if row_exists(&conn, sql, person_id)? {
                blockers.insert(*blocker);
            }
        }
        Ok(blockers)
    }
}

fn row_exists(conn: &Connection, sql: &str, person_id: i64) -> Result<bool> {
    let mut stmt = conn.prepare(sql)?;
    Ok(stmt.exists(params![person_id])?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::Blocker;
    use crate::error::StoreError;
    use crate::models::{Property, PropertyOwner, PropertyType, Role};
    use crate::testutil::{
        open_temp, seed_agent, seed_client, seed_deal, seed_person, seed_property,
    };

    fn set(blockers: &[Blocker]) -> BTreeSet<Blocker> {
        blockers.iter().copied().collect()
    }

    #[test]
    fn unreferenced_person_has_no_blockers_and_deletes() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Ana", "Ilic");
        assert!(db.blockers_for(person).unwrap().is_empty());
        assert!(db.delete_person(person).unwrap());
    }

    #[test]
    fn unknown_person_has_no_blockers() {
        let (_dir, db) = open_temp();
        assert!(db.blockers_for(31337).unwrap().is_empty());
    }

    #[test]
    fn client_row_alone_blocks_as_client() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Mira", "Petrova");
        seed_client(&db, person, None);

        assert_eq!(db.blockers_for(person).unwrap(), set(&[Blocker::Client]));
        assert!(matches!(
            db.delete_person(person).unwrap_err(),
            StoreError::Constraint(_)
        ));
    }

    #[test]
    fn agent_owning_a_property_blocks_on_both_relations() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Elena", "Ruseva");
        seed_agent(&db, person);
        db.insert_property(&Property {
            property_id: 0,
            price: None,
            square_meters: None,
            latitude: None,
            longitude: None,
            city: None,
            property_type: PropertyType::House,
            owner_id: Some(person),
        })
        .unwrap();

        assert_eq!(
            db.blockers_for(person).unwrap(),
            set(&[Blocker::Agent, Blocker::PropertyOwnerId])
        );
    }

    #[test]
    fn deals_block_agent_and_client_sides_separately() {
        let (_dir, db) = open_temp();

        let agent = seed_person(&db, "Elena", "Ruseva");
        seed_agent(&db, agent);
        let client = seed_person(&db, "Mira", "Petrova");
        seed_client(&db, client, None);
        let property = seed_property(&db, Some("80000"), PropertyType::Garage);
        seed_deal(&db, property, agent, client, Some("78000"));

        let agent_blockers = db.blockers_for(agent).unwrap();
        assert!(agent_blockers.contains(&Blocker::DealAgent));
        assert!(!agent_blockers.contains(&Blocker::DealClient));

        let client_blockers = db.blockers_for(client).unwrap();
        assert!(client_blockers.contains(&Blocker::DealClient));
        assert!(!client_blockers.contains(&Blocker::DealAgent));
    }

    #[test]
    fn role_assignments_and_ownership_links_block() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Petar", "Donev");
        let role = db
            .insert_role(&Role {
                role_id: 0,
                role_type: "broker".to_string(),
                has_full_access: false,
                can_post: true,
                can_authorize_sale: false,
            })
            .unwrap();
        db.assign_role(person, role).unwrap();
        let property = seed_property(&db, None, PropertyType::House);
        db.insert_owner_link(&PropertyOwner {
            person_id: person,
            property_id: property,
        })
        .unwrap();

        assert_eq!(
            db.blockers_for(person).unwrap(),
            set(&[Blocker::PersonRole, Blocker::OwnershipLink])
        );
    }

    #[test]
    fn empty_blockers_iff_delete_succeeds() {
        let (_dir, db) = open_temp();

        let person = seed_person(&db, "Mira", "Petrova");
        seed_client(&db, person, None);

        assert!(!db.blockers_for(person).unwrap().is_empty());
        assert!(db.delete_person(person).is_err());

        db.delete_client(person).unwrap();

        assert!(db.blockers_for(person).unwrap().is_empty());
        assert!(db.delete_person(person).unwrap());
    }

    #[test]
    fn labels_match_the_store_relations() {
        let labels: Vec<&str> = [
            Blocker::Client,
            Blocker::Agent,
            Blocker::PropertyOwnerId,
            Blocker::DealAgent,
            Blocker::DealClient,
            Blocker::PersonRole,
            Blocker::OwnershipLink,
        ]
        .iter()
        .map(|b| b.as_str())
        .collect();

        assert_eq!(
            labels,
            vec![
                "client",
                "agent",
                "property.owner_id",
                "successful_deals.agent_id",
                "successful_deals.client_id",
                "person_roles",
                "property_owner",
            ]
        );
    }
}
