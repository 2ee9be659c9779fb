//! Availability filtering against the caller's policy.

use chrono::NaiveDate;
use mvcwatch_core::PolicyConfig;
use regex::Regex;

use crate::types::{AvailabilityResult, EnrichedSlot};

/// Fixed sentinel the wizard uses for a fully-booked office. Matched
/// case-sensitively against the source literal.
pub const NO_APPOINTMENTS_SENTINEL: &str = "No Appointments Available";

/// Filter the enriched slots down to the ones worth alerting on.
///
/// Single lazy pass in input order. Per slot:
/// 1. the sentinel text is skipped outright;
/// 2. the keyword gate passes when no filters are configured, or when any
///    filter occurs in the lowercased office name (a slot that never joined a
///    location has no name and passes only the no-filter case);
/// 3. when `policy.horizon_days` is set, the earliest date is parsed out of
///    the slot text and must fall within the horizon (`<=`, so a negative
///    horizon means "today or already past"). An unexpected text shape logs
///    a diagnostic and skips the record.
///
/// `today` is injected by the caller so horizon arithmetic is testable.
pub fn filter_availability<'a>(
    slots: &'a [EnrichedSlot],
    policy: &'a PolicyConfig,
    today: NaiveDate,
) -> impl Iterator<Item = AvailabilityResult> + 'a {
    slots.iter().filter_map(move |enriched| {
        let slot = &enriched.slot;
        if slot.first_open_slot == NO_APPOINTMENTS_SENTINEL {
            return None;
        }

        let name = enriched.location.as_ref().map(|l| l.name.as_str());
        if !policy.keyword_filters.is_empty() && !name.is_some_and(|n| policy.keyword_match(n)) {
            return None;
        }

        let mut earliest_date = None;
        if let Some(horizon_days) = policy.horizon_days {
            let Some(date) = parse_next_available(&slot.first_open_slot) else {
                tracing::warn!(
                    location_id = %slot.location_id,
                    text = %slot.first_open_slot,
                    "unexpected FirstOpenSlot format; skipping record"
                );
                return None;
            };
            if (date - today).num_days() > horizon_days {
                return None;
            }
            earliest_date = Some(date);
        }

        Some(AvailabilityResult {
            location_id: slot.location_id.clone(),
            name: name.map(str::to_string),
            first_open_slot: slot.first_open_slot.clone(),
            earliest_date,
        })
    })
}

/// Pull the earliest date token out of a slot text.
///
/// Pattern contract: the label substring `Next Available:` followed by an
/// `MM/DD/YYYY` token. Any other shape, including a token that is not a real
/// calendar date, is a not-matched outcome rather than an error.
fn parse_next_available(text: &str) -> Option<NaiveDate> {
    let re = Regex::new(r"Next Available:\s*(\d{2}/\d{2}/\d{4})").expect("valid regex");
    let token = re.captures(text)?.get(1)?.as_str();
    NaiveDate::parse_from_str(token, "%m/%d/%Y").ok()
}
