pub mod client;
pub mod error;
pub mod extract;
pub mod filter;
pub mod join;
pub mod types;

pub use client::{Service, WizardClient};
pub use error::ScrapeError;
pub use extract::{extract_tables, BlockOutcome, ExtractedTables};
pub use filter::filter_availability;
pub use join::join_slots;
pub use types::{AvailabilityResult, EnrichedSlot, LocationId, LocationRecord, TimeSlotRecord};
