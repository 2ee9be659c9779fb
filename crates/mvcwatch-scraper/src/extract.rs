//! Extraction of the named data blocks embedded in the wizard page.
//!
//! The appointment wizard populates its availability data as JS variable
//! assignments on individual lines of the page source:
//!
//! ```text
//! var locationData = [{"Id":1,"Name":"Newark", ...}, ...];
//! var timeData = [{"LocationId":1,"FirstOpenSlot":"..."}, ...];
//! var locationModel = {...};
//! ```
//!
//! Each marker is matched as an exact literal (so the shared `location`
//! prefix of `locationData`/`locationModel` cannot cross-fire), the literal
//! after the marker is cut at the first `;` on the line, and the remainder is
//! decoded with `serde_json`. A marker that never appears yields
//! [`BlockOutcome::Absent`], distinct from a malformed block, which fails
//! the whole extraction.

use crate::error::ScrapeError;
use crate::types::{LocationId, LocationRecord, TimeSlotRecord};

pub const LOCATION_DATA_MARKER: &str = "var locationData = ";
pub const TIME_DATA_MARKER: &str = "var timeData = ";
pub const LOCATION_MODEL_MARKER: &str = "var locationModel = ";

/// Outcome of looking for one named block: found and decoded, or never seen.
///
/// Absence is not an error: the caller logs a "not loaded" warning and
/// treats the table as empty. A block that is present but malformed never
/// reaches this type; it surfaces as [`ScrapeError::BlockParse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome<T> {
    Found(T),
    Absent,
}

impl<T> BlockOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, BlockOutcome::Found(_))
    }

    /// Unwrap into the found value, mapping `Absent` to the supplied default.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            BlockOutcome::Found(value) => value,
            BlockOutcome::Absent => default,
        }
    }
}

/// The three named blocks recovered from one wizard page.
#[derive(Debug)]
pub struct ExtractedTables {
    pub locations: BlockOutcome<Vec<LocationRecord>>,
    pub time_slots: BlockOutcome<Vec<TimeSlotRecord>>,
    /// Page-level view model. The page defines it alongside the tables; it
    /// is retained for diagnostics only, nothing downstream consumes it.
    pub location_model: BlockOutcome<serde_json::Value>,
}

/// Scan the raw page text for the three named data blocks.
///
/// Lines are scanned in order and scanning stops as soon as all three blocks
/// have been found.
///
/// # Errors
///
/// - [`ScrapeError::BlockParse`] when a block is present but its literal does
///   not decode as JSON.
/// - [`ScrapeError::BlockShape`] / [`ScrapeError::MissingField`] when a table
///   block decodes but does not have the expected record shape.
pub fn extract_tables(page: &str) -> Result<ExtractedTables, ScrapeError> {
    let mut locations = BlockOutcome::Absent;
    let mut time_slots = BlockOutcome::Absent;
    let mut location_model = BlockOutcome::Absent;

    for line in page.lines() {
        if locations.is_found() && time_slots.is_found() && location_model.is_found() {
            break;
        }
        if !locations.is_found() {
            if let Some(literal) = block_literal(line, LOCATION_DATA_MARKER) {
                locations = BlockOutcome::Found(decode_locations(literal)?);
                continue;
            }
        }
        if !time_slots.is_found() {
            if let Some(literal) = block_literal(line, TIME_DATA_MARKER) {
                time_slots = BlockOutcome::Found(decode_time_slots(literal)?);
                continue;
            }
        }
        if !location_model.is_found() {
            if let Some(literal) = block_literal(line, LOCATION_MODEL_MARKER) {
                let value = serde_json::from_str(literal).map_err(|e| {
                    ScrapeError::BlockParse {
                        block: "locationModel",
                        source: e,
                    }
                })?;
                location_model = BlockOutcome::Found(value);
            }
        }
    }

    Ok(ExtractedTables {
        locations,
        time_slots,
        location_model,
    })
}

/// Slice the JSON literal out of a line carrying `marker`.
///
/// Everything after the marker up to (not including) the first `;` on the
/// line, trimmed of surrounding whitespace. Returns `None` when the marker
/// does not occur.
fn block_literal<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let end = rest.find(';').unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn decode_locations(literal: &str) -> Result<Vec<LocationRecord>, ScrapeError> {
    const BLOCK: &str = "locationData";

    let value: serde_json::Value =
        serde_json::from_str(literal).map_err(|e| ScrapeError::BlockParse {
            block: BLOCK,
            source: e,
        })?;
    let Some(items) = value.as_array() else {
        return Err(ScrapeError::BlockShape { block: BLOCK });
    };

    items
        .iter()
        .map(|item| {
            let id = item
                .get("Id")
                .and_then(LocationId::from_value)
                .ok_or(ScrapeError::MissingField {
                    block: BLOCK,
                    field: "Id",
                })?;
            let name = item
                .get("Name")
                .and_then(serde_json::Value::as_str)
                .ok_or(ScrapeError::MissingField {
                    block: BLOCK,
                    field: "Name",
                })?
                .to_string();
            Ok(LocationRecord {
                id,
                name,
                raw: item.clone(),
            })
        })
        .collect()
}

fn decode_time_slots(literal: &str) -> Result<Vec<TimeSlotRecord>, ScrapeError> {
    const BLOCK: &str = "timeData";

    let value: serde_json::Value =
        serde_json::from_str(literal).map_err(|e| ScrapeError::BlockParse {
            block: BLOCK,
            source: e,
        })?;
    let Some(items) = value.as_array() else {
        return Err(ScrapeError::BlockShape { block: BLOCK });
    };

    items
        .iter()
        .map(|item| {
            let location_id = item
                .get("LocationId")
                .and_then(LocationId::from_value)
                .ok_or(ScrapeError::MissingField {
                    block: BLOCK,
                    field: "LocationId",
                })?;
            let first_open_slot = item
                .get("FirstOpenSlot")
                .and_then(serde_json::Value::as_str)
                .ok_or(ScrapeError::MissingField {
                    block: BLOCK,
                    field: "FirstOpenSlot",
                })?
                .to_string();
            Ok(TimeSlotRecord {
                location_id,
                first_open_slot,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><script>
        var locationData = [{"Id":1,"Name":"Newark","City":"Newark"},{"Id":2,"Name":"Paterson"}];
        var timeData = [{"LocationId":1,"FirstOpenSlot":"No Appointments Available"},{"LocationId":2,"FirstOpenSlot":"3 Appointments Available <br/> Next Available: 01/15/2030 10:00 AM"}];
        var locationModel = {"Id":0,"Name":""};
    </script></head></html>"#;

    #[test]
    fn recovers_one_record_per_top_level_element() {
        let tables = extract_tables(PAGE).expect("well-formed payload");
        let locations = tables.locations.unwrap_or(vec![]);
        let time_slots = tables.time_slots.unwrap_or(vec![]);
        assert_eq!(locations.len(), 2);
        assert_eq!(time_slots.len(), 2);
        assert_eq!(locations[0].name, "Newark");
        assert_eq!(locations[0].id, LocationId::new("1"));
        assert_eq!(time_slots[1].location_id, LocationId::new("2"));
        assert!(tables.location_model.is_found());
    }

    #[test]
    fn literal_is_cut_at_the_first_semicolon() {
        let page = r#"var timeData = [{"LocationId":5,"FirstOpenSlot":"x"}]; somethingElse();"#;
        let tables = extract_tables(page).expect("trailing code after ; is ignored");
        let slots = tables.time_slots.unwrap_or(vec![]);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].location_id, LocationId::new("5"));
    }

    #[test]
    fn missing_marker_is_absent_not_empty() {
        let page = r#"var timeData = [{"LocationId":1,"FirstOpenSlot":"x"}];"#;
        let tables = extract_tables(page).expect("timeData alone is fine");
        assert_eq!(tables.locations, BlockOutcome::Absent);
        assert!(tables.time_slots.is_found());
        assert_eq!(tables.location_model, BlockOutcome::Absent);
    }

    #[test]
    fn malformed_block_is_an_error_not_a_default() {
        let page = "var locationData = [{\"Id\":1,;\n";
        let result = extract_tables(page);
        assert!(
            matches!(result, Err(ScrapeError::BlockParse { block, .. }) if block == "locationData"),
            "expected BlockParse(locationData), got: {result:?}"
        );
    }

    #[test]
    fn record_missing_required_field_is_an_error() {
        let page = r#"var locationData = [{"Id":1}];"#;
        let result = extract_tables(page);
        assert!(
            matches!(
                result,
                Err(ScrapeError::MissingField { block, field }) if block == "locationData" && field == "Name"
            ),
            "expected MissingField(locationData.Name), got: {result:?}"
        );
    }

    #[test]
    fn non_array_table_block_is_an_error() {
        let page = r#"var timeData = {"LocationId":1};"#;
        let result = extract_tables(page);
        assert!(
            matches!(result, Err(ScrapeError::BlockShape { block }) if block == "timeData"),
            "expected BlockShape(timeData), got: {result:?}"
        );
    }

    #[test]
    fn location_model_marker_does_not_populate_location_data() {
        // Shared "location" prefix: only the exact literal may match.
        let page = r#"var locationModel = {"Id":0};"#;
        let tables = extract_tables(page).expect("model alone is fine");
        assert_eq!(tables.locations, BlockOutcome::Absent);
        assert!(tables.location_model.is_found());
    }

    #[test]
    fn scanning_stops_once_all_blocks_are_found() {
        // A malformed repeat of a marker after all three blocks must never be
        // reached.
        let page = format!("{PAGE}\nvar locationData = not json at all;");
        let tables = extract_tables(&page).expect("scan must stop before the malformed repeat");
        assert_eq!(tables.locations.unwrap_or(vec![]).len(), 2);
    }

    #[test]
    fn string_location_ids_are_accepted() {
        let page = r#"var timeData = [{"LocationId":"7","FirstOpenSlot":"x"}];"#;
        let tables = extract_tables(page).expect("string ids decode");
        let slots = tables.time_slots.unwrap_or(vec![]);
        assert_eq!(slots[0].location_id, LocationId::new("7"));
    }
}
