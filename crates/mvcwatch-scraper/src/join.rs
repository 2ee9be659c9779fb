//! Join between the time-slot table and the location table.

use crate::types::{EnrichedSlot, LocationRecord, TimeSlotRecord};

/// Attach each time slot to the first location record with an equal id.
///
/// Output preserves the input ordering of the time table. A slot whose id has
/// no match keeps `location: None`; ids are scoped per wizard page, so misses
/// are expected rather than an error. Duplicate location ids are not
/// rejected; the first occurrence wins.
pub fn join_slots(time_slots: Vec<TimeSlotRecord>, locations: &[LocationRecord]) -> Vec<EnrichedSlot> {
    time_slots
        .into_iter()
        .map(|slot| {
            let location = locations
                .iter()
                .find(|l| l.id == slot.location_id)
                .cloned();
            EnrichedSlot { slot, location }
        })
        .collect()
}
