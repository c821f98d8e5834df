//! # homestead-store
//!
//! Data-access layer for a small real-estate agency domain, backed by SQLite.
//!
//! The crate exposes a [`Database`] handle built around an injected
//! [`ConnectionProvider`] and provides typed CRUD helpers for every domain
//! model, a pre-delete referential-integrity probe for people, and a fixed
//! catalogue of read-only reporting queries.  Monetary and measurement
//! values are exact decimals end to end; nothing passes through binary
//! floating point.

pub mod agents;
pub mod clients;
pub mod database;
pub mod deals;
pub mod guard;
pub mod listings;
pub mod migrations;
pub mod models;
pub mod ownership;
pub mod people;
pub mod preferences;
pub mod properties;
pub mod reports;
pub mod roles;

mod error;

pub use database::{ConnectionProvider, Database, SqliteFile};
pub use error::StoreError;
pub use guard::Blocker;
pub use models::*;

#[cfg(test)]
pub(crate) mod testutil {
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use crate::database::Database;
    use crate::models::{Agent, Client, Person, Property, PropertyType, SuccessfulDeal};

    /// Open a fresh database in a throwaway directory.  The [`TempDir`] must
    /// outlive the database it backs.
    pub fn open_temp() -> (TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::open_at(&dir.path().join("test.db")).expect("open database");
        (dir, db)
    }

    pub fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    pub fn seed_person(db: &Database, first: &str, last: &str) -> i64 {
        db.insert_person(&Person {
            person_id: 0,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            phone_number: None,
        })
        .expect("insert person")
    }

    pub fn seed_agent(db: &Database, person_id: i64) {
        db.insert_agent(&Agent {
            person_id,
            salary: None,
            hire_date: None,
        })
        .expect("insert agent");
    }

    pub fn seed_client(db: &Database, person_id: i64, budget: Option<&str>) {
        db.insert_client(&Client {
            person_id,
            budget: budget.map(dec),
            area_interested_in: None,
        })
        .expect("insert client");
    }

    pub fn seed_property(db: &Database, price: Option<&str>, property_type: PropertyType) -> i64 {
        db.insert_property(&Property {
            property_id: 0,
            price: price.map(dec),
            square_meters: None,
            latitude: None,
            longitude: None,
            city: None,
            property_type,
            owner_id: None,
        })
        .expect("insert property")
    }

    pub fn seed_deal(
        db: &Database,
        property_id: i64,
        agent_id: i64,
        client_id: i64,
        final_price: Option<&str>,
    ) -> i64 {
        db.insert_deal(&SuccessfulDeal {
            deal_id: 0,
            property_id,
            final_price: final_price.map(dec),
            agent_id,
            client_id,
        })
        .expect("insert deal")
    }
}
