//! Read-only reporting queries over the whole domain.
//!
//! Join-only reports run as plain SQL.  Reports that compare or aggregate
//! decimal values fetch the joined rows and group in Rust over [`Decimal`]:
//! SQLite's SUM/AVG and its ordering of NUMERIC affinity both go through
//! 8-byte binary floats, and decimal columns here are canonical TEXT.
//!
//! Every ordering ends in a deterministic tiebreak, so reruns over unchanged
//! data return identical sequences.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use crate::database::{decimal_column, decimal_value, property_type_value, Database};
use crate::error::Result;
use crate::models::{
    AgentSalesRow, AvgSaleByTypeRow, ClientBudgetMatchRow, ClientDealsRow, PropertyOwnerRow,
    PropertyType, UnsoldPropertyRow,
};

impl Database {
    /// Every property with its owner, if it has one.  Ordered by property
    /// id; owner id and name are absent for unowned inventory.
    pub fn properties_with_optional_owner(&self) -> Result<Vec<PropertyOwnerRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT p.property_id, p.property_type, p.city, p.owner_id,
                    pe.first_name || ' ' || pe.last_name AS owner_name
             FROM property p
             LEFT JOIN person pe ON pe.person_id = p.owner_id
             ORDER BY p.property_id",
        )?;

        let rows = stmt.query_map([], |row| {
            let type_str: String = row.get(1)?;
            Ok(PropertyOwnerRow {
                property_id: row.get(0)?,
                property_type: property_type_value(1, type_str)?,
                city: row.get(2)?,
                owner_id: row.get(3)?,
                owner_name: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Sales totals per agent, over agents with at least one deal.
    ///
    /// Ordered by total sales descending, then deal count descending, then
    /// agent id ascending.  Deals without a recorded price count toward
    /// `deals` but contribute nothing to the total.
    pub fn top_agents_by_sales(&self) -> Result<Vec<AgentSalesRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT a.person_id, pe.first_name, pe.last_name, d.final_price
             FROM successful_deals d
             INNER JOIN agent a ON a.person_id = d.agent_id
             INNER JOIN person pe ON pe.person_id = a.person_id",
        )?;

        let rows = stmt.query_map([], |row| {
            let final_price: Option<String> = row.get(3)?;
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                decimal_column(3, final_price)?,
            ))
        })?;

        let mut by_agent: BTreeMap<i64, AgentSalesRow> = BTreeMap::new();
        for row in rows {
            let (agent_id, first_name, last_name, final_price) = row?;
            let entry = by_agent.entry(agent_id).or_insert_with(|| AgentSalesRow {
                agent_id,
                first_name,
                last_name,
                deals: 0,
                total_sales: Decimal::ZERO,
            });
            entry.deals += 1;
            if let Some(price) = final_price {
                entry.total_sales += price;
            }
        }

        let mut out: Vec<AgentSalesRow> = by_agent.into_values().collect();
        out.sort_by(|a, b| {
            b.total_sales
                .cmp(&a.total_sales)
                .then(b.deals.cmp(&a.deals))
                .then(a.agent_id.cmp(&b.agent_id))
        });
        Ok(out)
    }

    /// Priced properties a client could afford, ordered by price ascending
    /// (property id breaks ties).
    ///
    /// An unknown client id, or a client without a budget, yields an empty
    /// sequence; neither is an error.
    pub fn properties_under_client_budget(
        &self,
        client_id: i64,
    ) -> Result<Vec<ClientBudgetMatchRow>> {
        let conn = self.connect()?;
        let client = conn
            .query_row(
                "SELECT pe.first_name || ' ' || pe.last_name AS client_name, c.budget
                 FROM client c
                 INNER JOIN person pe ON pe.person_id = c.person_id
                 WHERE c.person_id = ?1",
                params![client_id],
                |row| {
                    let budget: Option<String> = row.get(1)?;
                    Ok((row.get::<_, String>(0)?, decimal_column(1, budget)?))
                },
            )
            .optional()?;

        let (client_name, budget) = match client {
            Some((name, Some(budget))) => (name, budget),
            _ => return Ok(Vec::new()),
        };

        let mut stmt = conn.prepare(
            "SELECT property_id, city, property_type, price
             FROM property
             WHERE price IS NOT NULL",
        )?;
        let rows = stmt.query_map([], |row| {
            let type_str: String = row.get(2)?;
            let price: String = row.get(3)?;
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                property_type_value(2, type_str)?,
                decimal_value(3, price)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (property_id, city, property_type, price) = row?;
            if price <= budget {
                out.push(ClientBudgetMatchRow {
                    client_id,
                    client_name: client_name.clone(),
                    property_id,
                    city,
                    property_type,
                    price,
                });
            }
        }
        out.sort_by(|a, b| a.price.cmp(&b.price).then(a.property_id.cmp(&b.property_id)));
        Ok(out)
    }

    /// Average final price per property type, over types with at least one
    /// deal.
    ///
    /// Ordered by average descending with absent averages first (a type
    /// whose deals all lack a price still appears, with `None`), then by
    /// property type name.
    pub fn avg_sale_price_by_property_type(&self) -> Result<Vec<AvgSaleByTypeRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT p.property_type, d.final_price
             FROM successful_deals d
             INNER JOIN property p ON p.property_id = d.property_id",
        )?;

        let rows = stmt.query_map([], |row| {
            let type_str: String = row.get(0)?;
            let final_price: Option<String> = row.get(1)?;
            Ok((
                property_type_value(0, type_str)?,
                decimal_column(1, final_price)?,
            ))
        })?;

        // (all deals, priced deals, sum of priced)
        let mut by_type: BTreeMap<PropertyType, (i64, i64, Decimal)> = BTreeMap::new();
        for row in rows {
            let (property_type, final_price) = row?;
            let entry = by_type.entry(property_type).or_insert((0, 0, Decimal::ZERO));
            entry.0 += 1;
            if let Some(price) = final_price {
                entry.1 += 1;
                entry.2 += price;
            }
        }

        let mut out: Vec<AvgSaleByTypeRow> = by_type
            .into_iter()
            .map(|(property_type, (deals, priced, sum))| AvgSaleByTypeRow {
                property_type,
                deals,
                avg_final_price: (priced > 0).then(|| sum / Decimal::from(priced)),
            })
            .collect();
        out.sort_by(|a, b| {
            desc_nulls_first(&a.avg_final_price, &b.avg_final_price)
                .then_with(|| a.property_type.as_str().cmp(b.property_type.as_str()))
        });
        Ok(out)
    }

    /// Deal counts per client, over clients with at least one deal.
    ///
    /// Ordered by deal count descending, then total spent descending, then
    /// client id ascending.
    pub fn top_clients_by_deals(&self) -> Result<Vec<ClientDealsRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT c.person_id, pe.first_name, pe.last_name, d.final_price
             FROM successful_deals d
             INNER JOIN client c ON c.person_id = d.client_id
             INNER JOIN person pe ON pe.person_id = c.person_id",
        )?;

        let rows = stmt.query_map([], |row| {
            let final_price: Option<String> = row.get(3)?;
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                decimal_column(3, final_price)?,
            ))
        })?;

        let mut by_client: BTreeMap<i64, ClientDealsRow> = BTreeMap::new();
        for row in rows {
            let (client_id, first_name, last_name, final_price) = row?;
            let entry = by_client.entry(client_id).or_insert_with(|| ClientDealsRow {
                client_id,
                first_name,
                last_name,
                deals: 0,
                total_spent: Decimal::ZERO,
            });
            entry.deals += 1;
            if let Some(price) = final_price {
                entry.total_spent += price;
            }
        }

        let mut out: Vec<ClientDealsRow> = by_client.into_values().collect();
        out.sort_by(|a, b| {
            b.deals
                .cmp(&a.deals)
                .then(b.total_spent.cmp(&a.total_spent))
                .then(a.client_id.cmp(&b.client_id))
        });
        Ok(out)
    }

    /// Properties no deal has ever referenced, ordered by property id.
    pub fn unsold_properties(&self) -> Result<Vec<UnsoldPropertyRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT p.property_id, p.property_type, p.city, p.price
             FROM property p
             LEFT JOIN successful_deals d ON d.property_id = p.property_id
             WHERE d.deal_id IS NULL
             ORDER BY p.property_id",
        )?;

        let rows = stmt.query_map([], |row| {
            let type_str: String = row.get(1)?;
            let price: Option<String> = row.get(3)?;
            Ok(UnsoldPropertyRow {
                property_id: row.get(0)?,
                property_type: property_type_value(1, type_str)?,
                city: row.get(2)?,
                price: decimal_column(3, price)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// Descending order that places absent values first, the way Postgres
/// orders `DESC` columns with NULLs.
fn desc_nulls_first(a: &Option<Decimal>, b: &Option<Decimal>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(x),
    }
}
