//! Entity catalog
//!
//! The three tables this pipeline produces, with their projection schemas,
//! primary keys, and source files. The projection lists source-side field
//! names; dotted paths (e.g. `location.lat`) flatten to underscore-joined
//! column names when the table is built.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity tag selecting per-entity extraction and cleaning behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    /// Charging network customers
    Users,
    /// Physical charging stations
    Chargers,
    /// Charging sessions, reconciled with payments
    Transactions,
}

impl Entity {
    /// All entities, in the order a full batch processes them
    pub const ALL: [Entity; 3] = [Entity::Users, Entity::Chargers, Entity::Transactions];

    /// Output table name (also the CSV file stem)
    pub fn table_name(self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Chargers => "chargers",
            Entity::Transactions => "transactions",
        }
    }

    /// Ordered projection schema: the source fields copied into flat records
    pub fn projection(self) -> &'static [&'static str] {
        match self {
            Entity::Users => &["user_id", "name", "email", "tier", "created_at"],
            Entity::Chargers => &[
                "charger_id",
                "city",
                "location.lat",
                "location.lon",
                "installed_at",
            ],
            Entity::Transactions => &[
                "session_id",
                "user_id",
                "charger_id",
                "start_time",
                "end_time",
                "kWh_consumed",
                "status",
                "payment_method",
                "amount",
                "currency",
            ],
        }
    }

    /// Primary-key column, unique and non-null after cleaning
    pub fn primary_key(self) -> &'static str {
        match self {
            Entity::Users => "user_id",
            Entity::Chargers => "charger_id",
            Entity::Transactions => "session_id",
        }
    }

    /// JSON files this entity reads from the source directory
    pub fn source_files(self) -> &'static [&'static str] {
        match self {
            Entity::Users => &["users.json"],
            Entity::Chargers => &["chargers.json"],
            Entity::Transactions => &["transactions.json", "payments.json"],
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Entity::Users),
            "chargers" => Ok(Entity::Chargers),
            "transactions" => Ok(Entity::Transactions),
            other => Err(Error::unknown_table(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("users", Entity::Users)]
    #[test_case("chargers", Entity::Chargers)]
    #[test_case("transactions", Entity::Transactions)]
    fn test_parse_known(input: &str, expected: Entity) {
        assert_eq!(input.parse::<Entity>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_fails_before_io() {
        let err = "payments".parse::<Entity>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown table name: payments");
    }

    #[test_case(Entity::Users, "user_id")]
    #[test_case(Entity::Chargers, "charger_id")]
    #[test_case(Entity::Transactions, "session_id")]
    fn test_primary_key(entity: Entity, key: &str) {
        assert_eq!(entity.primary_key(), key);
        assert!(entity.projection().contains(&key));
    }

    #[test]
    fn test_transactions_reads_both_sources() {
        assert_eq!(
            Entity::Transactions.source_files(),
            &["transactions.json", "payments.json"]
        );
    }

    #[test]
    fn test_display_matches_table_name() {
        for entity in Entity::ALL {
            assert_eq!(entity.to_string(), entity.table_name());
        }
    }
}
