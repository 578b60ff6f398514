//! Timestamp resolution
//!
//! Every point written in one run shares a single timestamp, either the
//! value given on the command line or the current time.

use chrono::{DateTime, Utc};

use crate::Result;

/// Resolve the timestamp to attach to all points
///
/// An empty string means "now". Anything else must be RFC 3339; offsets
/// are accepted and normalised to UTC.
///
/// # Examples
/// ```
/// use benchflux::util::time::determine_time;
///
/// let t = determine_time("2023-01-01T00:00:00Z").unwrap();
/// assert_eq!(t.timestamp(), 1672531200);
/// assert!(determine_time("not-a-time").is_err());
/// ```
pub fn determine_time(now: &str) -> Result<DateTime<Utc>> {
    if now.is_empty() {
        return Ok(Utc::now());
    }
    let parsed = DateTime::parse_from_rfc3339(now)?;
    Ok(parsed.with_timezone(&Utc))
}
