//! CRUD operations for [`Agent`] records.
//!
//! An agent row shares its identity with an existing person; the insert is
//! not pre-validated here, the store's foreign key rejects an unknown id.

use rusqlite::{params, OptionalExtension};

use crate::database::{date_column, decimal_column, ensure_id, Database};
use crate::error::Result;
use crate::models::Agent;

impl Database {
    /// Insert an agent row for an existing person.
    pub fn insert_agent(&self, agent: &Agent) -> Result<()> {
        ensure_id(agent.person_id)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO agent (person_id, salary, hire_date)
             VALUES (?1, ?2, ?3)",
            params![
                agent.person_id,
                agent.salary.map(|d| d.to_string()),
                agent.hire_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    /// Fetch a single agent by person id.
    pub fn find_agent(&self, person_id: i64) -> Result<Option<Agent>> {
        let conn = self.connect()?;
        let agent = conn
            .query_row(
                "SELECT person_id, salary, hire_date
                 FROM agent
                 WHERE person_id = ?1",
                params![person_id],
                row_to_agent,
            )
            .optional()?;
        Ok(agent)
    }

    /// List all agents, ordered by person id.
    pub fn list_agents(&self) -> Result<Vec<Agent>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT person_id, salary, hire_date
             FROM agent
             ORDER BY person_id",
        )?;

        let rows = stmt.query_map([], row_to_agent)?;

        let mut agents = Vec::new();
        for row in rows {
            agents.push(row?);
        }
        Ok(agents)
    }

    /// Replace the agent's mutable columns.  Missing identity is a no-op.
    pub fn update_agent(&self, agent: &Agent) -> Result<()> {
        ensure_id(agent.person_id)?;
        let conn = self.connect()?;
        conn.execute(
            "UPDATE agent
             SET salary = ?1, hire_date = ?2
             WHERE person_id = ?3",
            params![
                agent.salary.map(|d| d.to_string()),
                agent.hire_date.map(|d| d.to_string()),
                agent.person_id,
            ],
        )?;
        Ok(())
    }

    /// Delete an agent row.  Returns `true` if a row was deleted.
    pub fn delete_agent(&self, person_id: i64) -> Result<bool> {
        ensure_id(person_id)?;
        let conn = self.connect()?;
        let affected =
            conn.execute("DELETE FROM agent WHERE person_id = ?1", params![person_id])?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to an [`Agent`].
fn row_to_agent(row: &rusqlite::Row<'_>) -> rusqlite::Result<Agent> {
    let salary: Option<String> = row.get(1)?;
    let hire_date: Option<String> = row.get(2)?;

    Ok(Agent {
        person_id: row.get(0)?,
        salary: decimal_column(1, salary)?,
        hire_date: date_column(2, hire_date)?,
    })
}
