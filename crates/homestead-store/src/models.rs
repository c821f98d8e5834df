//! Domain model structs persisted in the agency database, plus the read-only
//! projection rows produced by the reporting queries.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer over IPC.  Monetary and measurement values are
//! [`Decimal`] end to end; absent columns are `None`, never a sentinel.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// The root identity.  Agents and clients are role extensions keyed on the
/// same id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    /// Store-assigned identity.  Ignored on insert.
    pub person_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Agent role extension.  Exists only for a person id already present in
/// `person`; the store's foreign key enforces this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Agent {
    pub person_id: i64,
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client role extension, same identity-sharing rule as [`Agent`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub person_id: i64,
    pub budget: Option<Decimal>,
    pub area_interested_in: Option<String>,
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// Kind of property.  Stored as lowercase text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Garage,
    House,
    Apartment,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Garage => "garage",
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored property type string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePropertyTypeError(pub String);

impl fmt::Display for ParsePropertyTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown property type: {}", self.0)
    }
}

impl std::error::Error for ParsePropertyTypeError {}

impl FromStr for PropertyType {
    type Err = ParsePropertyTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "garage" => Ok(PropertyType::Garage),
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            other => Err(ParsePropertyTypeError(other.to_string())),
        }
    }
}

/// A property in inventory.  Unowned inventory is valid: `owner_id` is
/// `None` for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Property {
    /// Store-assigned identity.  Ignored on insert.
    pub property_id: i64,
    pub price: Option<Decimal>,
    pub square_meters: Option<Decimal>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub city: Option<String>,
    pub property_type: PropertyType,
    pub owner_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// An advertisement entry.  Independent of the other relations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Store-assigned identity.  Ignored on insert.
    pub listing_id: i64,
    pub type_of_listing: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Preference
// ---------------------------------------------------------------------------

/// A client's search preference.  Many per client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preference {
    /// Store-assigned identity.  Ignored on insert.
    pub preference_id: i64,
    pub client_id: i64,
    pub preference_type: String,
}

// ---------------------------------------------------------------------------
// PropertyOwner
// ---------------------------------------------------------------------------

/// Many-to-many ownership link.  The identity is the pair itself; there is
/// no surrogate key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct PropertyOwner {
    pub person_id: i64,
    pub property_id: i64,
}

// ---------------------------------------------------------------------------
// SuccessfulDeal
// ---------------------------------------------------------------------------

/// A closed sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessfulDeal {
    /// Store-assigned identity.  Ignored on insert.
    pub deal_id: i64,
    pub property_id: i64,
    pub final_price: Option<Decimal>,
    pub agent_id: i64,
    pub client_id: i64,
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A named permission bundle.  Stored and assignable; nothing in this crate
/// evaluates the flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Store-assigned identity.  Ignored on insert.
    pub role_id: i64,
    pub role_type: String,
    pub has_full_access: bool,
    pub can_post: bool,
    pub can_authorize_sale: bool,
}

// ---------------------------------------------------------------------------
// Projection rows
// ---------------------------------------------------------------------------

/// Row of [`crate::Database::properties_with_optional_owner`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyOwnerRow {
    pub property_id: i64,
    pub property_type: PropertyType,
    pub city: Option<String>,
    /// Absent when the property is unowned.
    pub owner_id: Option<i64>,
    /// Absent when the property is unowned.
    pub owner_name: Option<String>,
}

/// Row of [`crate::Database::top_agents_by_sales`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSalesRow {
    pub agent_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub deals: i64,
    /// Sum over the agent's deals; zero when every deal has no recorded
    /// price.
    pub total_sales: Decimal,
}

/// Row of [`crate::Database::properties_under_client_budget`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientBudgetMatchRow {
    pub client_id: i64,
    pub client_name: String,
    pub property_id: i64,
    pub city: Option<String>,
    pub property_type: PropertyType,
    pub price: Decimal,
}

/// Row of [`crate::Database::avg_sale_price_by_property_type`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvgSaleByTypeRow {
    pub property_type: PropertyType,
    pub deals: i64,
    /// Absent when every deal for the type has no recorded price.
    pub avg_final_price: Option<Decimal>,
}

/// Row of [`crate::Database::top_clients_by_deals`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientDealsRow {
    pub client_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub deals: i64,
    /// Sum over the client's deals; zero when every deal has no recorded
    /// price.
    pub total_spent: Decimal,
}

/// Row of [`crate::Database::unsold_properties`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnsoldPropertyRow {
    pub property_id: i64,
    pub property_type: PropertyType,
    pub city: Option<String>,
    pub price: Option<Decimal>,
}
