//! CRUD operations for [`SuccessfulDeal`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{decimal_column, ensure_id, Database};
use crate::error::Result;
use crate::models::SuccessfulDeal;

impl Database {
    /// Insert a new deal.  The identity on the way in is ignored; the
    /// store-assigned id is returned.  Property, agent and client must all
    /// exist.
    pub fn insert_deal(&self, deal: &SuccessfulDeal) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO successful_deals (property_id, final_price, agent_id, client_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                deal.property_id,
                deal.final_price.map(|d| d.to_string()),
                deal.agent_id,
                deal.client_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a single deal by id.
    pub fn find_deal(&self, deal_id: i64) -> Result<Option<SuccessfulDeal>> {
        let conn = self.connect()?;
        let deal = conn
            .query_row(
                "SELECT deal_id, property_id, final_price, agent_id, client_id
                 FROM successful_deals
                 WHERE deal_id = ?1",
                params![deal_id],
                row_to_deal,
            )
            .optional()?;
        Ok(deal)
    }

    /// List all deals, ordered by id.
    pub fn list_deals(&self) -> Result<Vec<SuccessfulDeal>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT deal_id, property_id, final_price, agent_id, client_id
             FROM successful_deals
             ORDER BY deal_id",
        )?;

        let rows = stmt.query_map([], row_to_deal)?;

        let mut deals = Vec::new();
        for row in rows {
            deals.push(row?);
        }
        Ok(deals)
    }

    /// Replace every mutable column.  Missing identity is a no-op.
    pub fn update_deal(&self, deal: &SuccessfulDeal) -> Result<()> {
        ensure_id(deal.deal_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE successful_deals
             SET property_id = ?1, final_price = ?2, agent_id = ?3, client_id = ?4
             WHERE deal_id = ?5",
            params![
                deal.property_id,
                deal.final_price.map(|d| d.to_string()),
                deal.agent_id,
                deal.client_id,
                deal.deal_id,
            ],
        )?;
        Ok(())
    }

    /// Delete a deal by id.  Returns `true` if a row was deleted.
    pub fn delete_deal(&self, deal_id: i64) -> Result<bool> {
        ensure_id(deal_id)?;
        let conn = self.connect()?;
        let affected = conn.execute(
            "DELETE FROM successful_deals WHERE deal_id = ?1",
            params![deal_id],
        )?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`SuccessfulDeal`].
fn row_to_deal(row: &rusqlite::Row<'_>) -> rusqlite::Result<SuccessfulDeal> {
    let final_price: Option<String> = row.get(2)?;

    Ok(SuccessfulDeal {
        deal_id: row.get(0)?,
        property_id: row.get(1)?,
        final_price: decimal_column(2, final_price)?,
        agent_id: row.get(3)?,
        client_id: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::models::{PropertyType, SuccessfulDeal};
    use crate::testutil::{
        dec, open_temp, seed_agent, seed_client, seed_deal, seed_person, seed_property,
    };

    /// A property plus an agent and a client, ready to close deals on.
    fn fixture(db: &crate::Database) -> (i64, i64, i64) {
        let agent = seed_person(db, "Elena", "Ruseva");
        seed_agent(db, agent);
        let client = seed_person(db, "Mira", "Petrova");
        seed_client(db, client, None);
        let property = seed_property(db, Some("120000"), PropertyType::Apartment);
        (property, agent, client)
    }

    #[test]
    fn insert_find_round_trip() {
        let (_dir, db) = open_temp();
        let (property, agent, client) = fixture(&db);

        let deal = SuccessfulDeal {
            deal_id: 0,
            property_id: property,
            final_price: Some(dec("117500.00")),
            agent_id: agent,
            client_id: client,
        };
        let id = db.insert_deal(&deal).unwrap();

        let found = db.find_deal(id).unwrap().expect("deal exists");
        assert_eq!(
            found,
            SuccessfulDeal {
                deal_id: id,
                ..deal
            }
        );
    }

    #[test]
    fn final_price_round_trips_absent() {
        let (_dir, db) = open_temp();
        let (property, agent, client) = fixture(&db);

        let id = seed_deal(&db, property, agent, client, None);
        let found = db.find_deal(id).unwrap().unwrap();
        assert_eq!(found.final_price, None);
    }

    #[test]
    fn insert_with_unknown_references_is_a_constraint_violation() {
        let (_dir, db) = open_temp();
        let (property, agent, client) = fixture(&db);

        for (p, a, c) in [(98, agent, client), (property, 98, client), (property, agent, 98)] {
            let err = db
                .insert_deal(&SuccessfulDeal {
                    deal_id: 0,
                    property_id: p,
                    final_price: None,
                    agent_id: a,
                    client_id: c,
                })
                .unwrap_err();
            assert!(matches!(err, StoreError::Constraint(_)));
        }
    }

    #[test]
    fn update_replaces_all_columns() {
        let (_dir, db) = open_temp();
        let (property, agent, client) = fixture(&db);
        let other_property = seed_property(&db, Some("95000"), PropertyType::Garage);

        let id = seed_deal(&db, property, agent, client, Some("120000"));
        db.update_deal(&SuccessfulDeal {
            deal_id: id,
            property_id: other_property,
            final_price: None,
            agent_id: agent,
            client_id: client,
        })
        .unwrap();

        let found = db.find_deal(id).unwrap().unwrap();
        assert_eq!(found.property_id, other_property);
        assert_eq!(found.final_price, None);
    }

    #[test]
    fn delete_reports_whether_a_row_went_away() {
        let (_dir, db) = open_temp();
        let (property, agent, client) = fixture(&db);

        let id = seed_deal(&db, property, agent, client, Some("99000"));
        assert!(db.delete_deal(id).unwrap());
        assert!(!db.delete_deal(id).unwrap());
    }
}
