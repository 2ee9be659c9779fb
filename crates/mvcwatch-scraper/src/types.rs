//! Domain types for the appointment wizard pipeline.

use chrono::NaiveDate;

/// Identifier shared between the location table and the time-slot table.
///
/// The embedded payload carries ids as either JSON numbers or strings
/// depending on the block; both forms normalise to the same key, so `2`
/// joins with `"2"`. Ids are scoped per wizard page, not globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Read an id out of a JSON value, accepting numbers and strings.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self(s.clone())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One office record from the `locationData` block.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocationRecord {
    pub id: LocationId,
    pub name: String,
    /// The full source object, preserved for diagnostics.
    pub raw: serde_json::Value,
}

/// One availability record from the `timeData` block.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSlotRecord {
    pub location_id: LocationId,
    /// Either the "No Appointments Available" sentinel or a formatted
    /// date fragment such as `"... <br/> Next Available: 01/15/2030 ..."`.
    pub first_open_slot: String,
}

/// A time slot joined with its office record, when one exists.
///
/// An unmatched slot keeps `location: None`; ids are per-wizard, so join
/// misses are expected rather than an error.
#[derive(Debug, Clone)]
pub struct EnrichedSlot {
    pub slot: TimeSlotRecord,
    pub location: Option<LocationRecord>,
}

/// A slot that passed the policy filter.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AvailabilityResult {
    pub location_id: LocationId,
    /// Office name; absent when the slot never joined a location record.
    pub name: Option<String>,
    pub first_open_slot: String,
    /// Parsed earliest date; populated only when the horizon gate ran.
    pub earliest_date: Option<NaiveDate>,
}
