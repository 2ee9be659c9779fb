//! Alert deduplication over an append-only status log.
//!
//! Each watcher cycle reads the most recent persisted status and decides
//! whether to act at all; after a successful decision it appends exactly one
//! timestamped entry. Prior entries are never rewritten. The storage seam is
//! the narrow [`StatusLog`] trait so the gate logic stays pure and testable
//! against an in-memory stub.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Minimum elapsed time before a repeat alert of the same resolved status.
const COOLDOWN_SECS: i64 = 2 * 60 * 60;

/// Resolved outcome of one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing to alert on; the next cycle may act immediately.
    Unavailable,
    /// An alert was produced; repeats are suppressed for the cooldown window.
    Found,
    /// The polled item page no longer exists; treated like an alert for
    /// cooldown purposes.
    SorryInvalidItem,
}

impl Status {
    pub fn token(self) -> &'static str {
        match self {
            Status::Unavailable => "unavailable",
            Status::Found => "found",
            Status::SorryInvalidItem => "sorry",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "unavailable" => Some(Status::Unavailable),
            "found" => Some(Status::Found),
            "sorry" => Some(Status::SorryInvalidItem),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// One persisted log entry. Wire form is a single line:
/// `"<RFC 3339 timestamp>,<status token>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub observed_at: DateTime<Utc>,
    pub status: Status,
}

impl StatusEntry {
    pub fn to_line(&self) -> String {
        format!("{},{}", self.observed_at.to_rfc3339(), self.status.token())
    }

    pub fn parse_line(line: &str) -> Option<Self> {
        let (timestamp, token) = line.trim().split_once(',')?;
        let observed_at = DateTime::parse_from_rfc3339(timestamp)
            .ok()?
            .with_timezone(&Utc);
        Some(Self {
            observed_at,
            status: Status::from_token(token)?,
        })
    }
}

#[derive(Debug, Error)]
pub enum StatusLogError {
    #[error("status log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Narrow persistence seam: read the most recent entry, append one entry.
pub trait StatusLog {
    /// The most recent entry, or `None` when no usable state exists.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogError::Io`] when the backing store cannot be read.
    fn load_last(&self) -> Result<Option<StatusEntry>, StatusLogError>;

    /// Append one entry. Never rewrites prior entries.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogError::Io`] when the backing store cannot be
    /// written.
    fn append(&mut self, entry: &StatusEntry) -> Result<(), StatusLogError>;
}

/// Line-oriented append-only log file.
///
/// An absent file is equivalent to "no prior state". Only the final line is
/// consulted on load; an unparseable tail degrades to no prior state with a
/// warning rather than failing the cycle.
pub struct FileStatusLog {
    path: PathBuf,
}

impl FileStatusLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatusLog for FileStatusLog {
    fn load_last(&self) -> Result<Option<StatusEntry>, StatusLogError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let Some(line) = content.lines().filter(|l| !l.trim().is_empty()).last() else {
            return Ok(None);
        };
        match StatusEntry::parse_line(line) {
            Some(entry) => Ok(Some(entry)),
            None => {
                tracing::warn!(
                    path = %self.path.display(),
                    line,
                    "unparseable status log tail; treating as no prior state"
                );
                Ok(None)
            }
        }
    }

    fn append(&mut self, entry: &StatusEntry) -> Result<(), StatusLogError> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.to_line())?;
        Ok(())
    }
}

/// In-memory log for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStatusLog {
    entries: Vec<StatusEntry>,
}

impl MemoryStatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }
}

impl StatusLog for MemoryStatusLog {
    fn load_last(&self) -> Result<Option<StatusEntry>, StatusLogError> {
        Ok(self.entries.last().cloned())
    }

    fn append(&mut self, entry: &StatusEntry) -> Result<(), StatusLogError> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

/// Rate-limiting gate over a [`StatusLog`].
///
/// `Unavailable` is always immediately re-actionable; only `Found` and
/// `SorryInvalidItem` are held back by the cooldown. The asymmetry is
/// intentional: a fully-booked poll should keep probing at full cadence,
/// while a raised alert must not repeat until the window passes.
pub struct DedupGate<L: StatusLog> {
    log: L,
}

impl<L: StatusLog> DedupGate<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }

    /// Whether this cycle should fetch and decide at all.
    ///
    /// # Errors
    ///
    /// Propagates [`StatusLogError`] from the backing log.
    pub fn should_act(&self, now: DateTime<Utc>) -> Result<bool, StatusLogError> {
        let Some(last) = self.log.load_last()? else {
            return Ok(true);
        };
        Ok(match last.status {
            Status::Unavailable => true,
            Status::Found | Status::SorryInvalidItem => {
                now.signed_duration_since(last.observed_at) > Duration::seconds(COOLDOWN_SECS)
            }
        })
    }

    /// Append this cycle's resolved status. The only state mutation.
    ///
    /// # Errors
    ///
    /// Propagates [`StatusLogError`] from the backing log.
    pub fn record_status(&mut self, status: Status, now: DateTime<Utc>) -> Result<(), StatusLogError> {
        self.log.append(&StatusEntry {
            observed_at: now,
            status,
        })
    }
}
