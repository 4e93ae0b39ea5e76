//! Destination container name allocation.
//!

use core::fmt::{Debug, Display};

use chrono::{DateTime, TimeZone};
use thiserror::Error;

/// The storage system's limit on container name length.
pub const MAX_NAME_LENGTH: usize = 63;

/// Literal tag marking a container as a backup artifact.
pub const BACKUP_MARKER: &str = "bkp";

/// Cap on collision-resolution attempts before giving up.
pub const MAX_ATTEMPTS: u32 = 4096;

/// The identity of a prospective backup container name.
#[derive(Debug, Clone, Copy)]
pub struct NameRequest<'a> {
    /// Minute-resolution timestamp, shared by every container in a run.
    pub timestamp: &'a str,

    /// The backup marker literal.
    pub marker: &'a str,

    /// The account owning the source container.
    pub source_account: &'a str,

    /// The container being backed up.
    pub source_container: &'a str,
}

impl NameRequest<'_> {
    /// Assemble a candidate name: `timestamp`, `marker`, the disambiguator if
    /// one is needed, `source_account`, `source_container`, truncated as a
    /// whole.
    fn candidate(&self, disambiguator: Option<u32>) -> String {
        let mut name = String::with_capacity(MAX_NAME_LENGTH);
        name.push_str(self.timestamp);
        name.push_str(self.marker);
        if let Some(count) = disambiguator {
            name.push_str(&count.to_string());
        }
        name.push_str(self.source_account);
        name.push_str(self.source_container);
        truncated(name)
    }
}

/// Allocate a destination container name that does not collide with any name
/// `exists` reports as taken.
///
/// `exists` must reflect the live state of the destination account at call
/// time; it is consulted once per candidate. An `exists` failure aborts the
/// allocation, it is never treated as "name is free".
pub fn allocate<E: Display + Debug>(
    request: &NameRequest<'_>,
    mut exists: impl FnMut(&str) -> Result<bool, E>,
) -> Result<String, AllocateError<E>> {
    let first = request.candidate(None);
    if !exists(&first).map_err(AllocateError::Exists)? {
        return Ok(first);
    }

    for count in 0..MAX_ATTEMPTS {
        let candidate = request.candidate(Some(count));
        if !exists(&candidate).map_err(AllocateError::Exists)? {
            return Ok(candidate);
        }
    }

    Err(AllocateError::NameSpaceExhausted(MAX_ATTEMPTS))
}

/// Truncate a name to the leftmost [`MAX_NAME_LENGTH`] characters.
///
/// Individual fields are never truncated, only the assembled name; for long
/// account + container combinations the tail of the source container segment
/// is silently cut off.
pub fn truncated(mut name: String) -> String {
    if name.len() > MAX_NAME_LENGTH {
        let mut end = MAX_NAME_LENGTH;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    name
}

/// Format the shared run timestamp: year, month, day, hour, minute.
pub fn minute_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("%Y%m%d%H%M").to_string()
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum AllocateError<E: Display + Debug> {
    #[error("No unique name found after {0} attempts")]
    NameSpaceExhausted(u32),

    #[error("Existence check failed:\n{0}")]
    Exists(E),
}
