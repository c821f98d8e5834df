//! v001 -- Initial schema creation.
//!
//! Creates the nine tables of the agency domain.  Decimal-valued columns
//! (price, salary, budget, square meters, final price) are stored as
//! canonical decimal strings in TEXT columns; NUMERIC affinity would let
//! SQLite coerce them to 8-byte binary floats.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- People (root identity)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS person (
    person_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    email        TEXT,
    phone_number TEXT
);

-- ----------------------------------------------------------------
-- Role extensions: agent / client share the person identity
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS agent (
    person_id INTEGER PRIMARY KEY NOT NULL,
    salary    TEXT,                          -- exact decimal string
    hire_date TEXT,                          -- ISO-8601 date

    FOREIGN KEY (person_id) REFERENCES person(person_id)
);

CREATE TABLE IF NOT EXISTS client (
    person_id          INTEGER PRIMARY KEY NOT NULL,
    budget             TEXT,                 -- exact decimal string
    area_interested_in TEXT,

    FOREIGN KEY (person_id) REFERENCES person(person_id)
);

-- ----------------------------------------------------------------
-- Properties
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS property (
    property_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    price         TEXT,                      -- exact decimal string
    square_meters TEXT,                      -- exact decimal string
    latitude      TEXT,
    longitude     TEXT,
    city          TEXT,
    property_type TEXT NOT NULL
        CHECK (property_type IN ('garage', 'house', 'apartment')),
    owner_id      INTEGER,                   -- nullable FK -> person(person_id)

    FOREIGN KEY (owner_id) REFERENCES person(person_id)
);

CREATE INDEX IF NOT EXISTS idx_property_owner_id ON property(owner_id);

-- ----------------------------------------------------------------
-- Listings
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS listing (
    listing_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    type_of_listing TEXT,
    description     TEXT,
    notes           TEXT
);

-- ----------------------------------------------------------------
-- Client preferences
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS preferences (
    preference_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id       INTEGER NOT NULL,
    preference_type TEXT NOT NULL,

    FOREIGN KEY (client_id) REFERENCES client(person_id)
);

CREATE INDEX IF NOT EXISTS idx_preferences_client_id ON preferences(client_id);

-- ----------------------------------------------------------------
-- Ownership links (composite identity)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS property_owner (
    person_id   INTEGER NOT NULL,
    property_id INTEGER NOT NULL,

    PRIMARY KEY (person_id, property_id),
    FOREIGN KEY (person_id)   REFERENCES person(person_id),
    FOREIGN KEY (property_id) REFERENCES property(property_id)
);

-- ----------------------------------------------------------------
-- Closed sales
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS successful_deals (
    deal_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    property_id INTEGER NOT NULL,
    final_price TEXT,                        -- exact decimal string
    agent_id    INTEGER NOT NULL,
    client_id   INTEGER NOT NULL,

    FOREIGN KEY (property_id) REFERENCES property(property_id),
    FOREIGN KEY (agent_id)    REFERENCES agent(person_id),
    FOREIGN KEY (client_id)   REFERENCES client(person_id)
);

CREATE INDEX IF NOT EXISTS idx_deals_property_id ON successful_deals(property_id);
CREATE INDEX IF NOT EXISTS idx_deals_agent_id    ON successful_deals(agent_id);
CREATE INDEX IF NOT EXISTS idx_deals_client_id   ON successful_deals(client_id);

-- ----------------------------------------------------------------
-- Roles
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS role (
    role_id            INTEGER PRIMARY KEY AUTOINCREMENT,
    role_type          TEXT NOT NULL,
    has_full_access    INTEGER NOT NULL DEFAULT 0,   -- boolean 0/1
    can_post           INTEGER NOT NULL DEFAULT 0,   -- boolean 0/1
    can_authorize_sale INTEGER NOT NULL DEFAULT 0    -- boolean 0/1
);

CREATE TABLE IF NOT EXISTS person_roles (
    person_id INTEGER NOT NULL,
    role_id   INTEGER NOT NULL,

    PRIMARY KEY (person_id, role_id),
    FOREIGN KEY (person_id) REFERENCES person(person_id),
    FOREIGN KEY (role_id)   REFERENCES role(role_id)
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
