pub mod dedup;
pub mod mailer;
pub mod message;

pub use dedup::{DedupGate, FileStatusLog, MemoryStatusLog, Status, StatusEntry, StatusLog};
pub use mailer::{send, NotifyError};
pub use message::{availability_subject, render_availability, render_stock_alert, stock_subject};
