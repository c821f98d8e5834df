//! Database connection management.
//!
//! There is no ambient connection state: a [`ConnectionProvider`] is
//! injected into [`Database`] at construction and every operation acquires
//! its own handle from it, dropped when the operation finishes.  Nothing
//! caches a handle across operations.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use directories::ProjectDirs;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{Result, StoreError};
use crate::migrations;
use crate::models::PropertyType;

/// A capability that yields a usable SQLite handle on demand.
///
/// Implementations must hand back a fully configured connection; callers
/// treat it as scoped to one operation.
pub trait ConnectionProvider: Send + Sync {
    fn connect(&self) -> Result<Connection>;
}

/// File-backed provider.  Every call opens the same database file and
/// applies the recommended pragmas.
pub struct SqliteFile {
    path: PathBuf,
}

impl SqliteFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider for the platform-appropriate default database location:
    /// - Linux:   `~/.local/share/homestead/homestead.db`
    /// - macOS:   `~/Library/Application Support/com.homestead.homestead/homestead.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\homestead\homestead\data\homestead.db`
    pub fn default_location() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "homestead", "homestead").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(Self::new(data_dir.join("homestead.db")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for SqliteFile {
    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;

        // Recommended SQLite settings.  Foreign keys are the authoritative
        // integrity gate for every write in this crate.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(conn)
    }
}

/// Entry point for the store.  Owns the injected [`ConnectionProvider`] and
/// guarantees that migrations have run before any other operation.
pub struct Database {
    provider: Box<dyn ConnectionProvider>,
}

impl Database {
    /// Open (or create) the default application database.
    pub fn new() -> Result<Self> {
        let provider = SqliteFile::default_location()?;

        tracing::info!(path = %provider.path().display(), "opening database");

        Self::open(provider)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        Self::open(SqliteFile::new(path))
    }

    /// Build a database around any connection provider.
    ///
    /// Migrations run here, once, through a throwaway handle.
    pub fn open(provider: impl ConnectionProvider + 'static) -> Result<Self> {
        let conn = provider.connect()?;
        migrations::run_migrations(&conn)?;

        Ok(Self {
            provider: Box::new(provider),
        })
    }

    /// Acquire a handle scoped to a single operation.
    pub(crate) fn connect(&self) -> Result<Connection> {
        self.provider.connect()
    }
}

// ---------------------------------------------------------------------------
// Column helpers shared by the row mappers
// ---------------------------------------------------------------------------

/// Reject non-positive identifiers before they reach the store.
pub(crate) fn ensure_id(id: i64) -> Result<()> {
    if id < 1 {
        return Err(StoreError::Validation("identifier must be positive"));
    }
    Ok(())
}

/// Parse a decimal stored as canonical TEXT.
pub(crate) fn decimal_value(idx: usize, value: String) -> rusqlite::Result<Decimal> {
    Decimal::from_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a nullable decimal TEXT column.
pub(crate) fn decimal_column(
    idx: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<Decimal>> {
    value.map(|s| decimal_value(idx, s)).transpose()
}

/// Parse a nullable ISO-8601 date TEXT column.
pub(crate) fn date_column(idx: usize, value: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::from_str(&s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()
}

/// Parse the `property_type` TEXT column.
pub(crate) fn property_type_value(idx: usize, value: String) -> rusqlite::Result<PropertyType> {
    PropertyType::from_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.connect().is_ok());
    }

    #[test]
    fn provider_yields_fresh_handles() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqliteFile::new(dir.path().join("test.db"));

        let db = Database::open(provider).expect("should open");
        let a = db.connect().expect("first handle");
        let b = db.connect().expect("second handle");
        drop(a);

        // The second handle stays usable after the first is gone.
        let n: i64 = b
            .query_row("SELECT COUNT(*) FROM person", [], |row| row.get(0))
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn ensure_id_rejects_non_positive() {
        assert!(matches!(ensure_id(0), Err(StoreError::Validation(_))));
        assert!(matches!(ensure_id(-4), Err(StoreError::Validation(_))));
        assert!(ensure_id(1).is_ok());
    }
}
