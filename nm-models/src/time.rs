//! Timestamp normalization.
//!
//! Stored dates arrive in several shapes (RFC 3339 with `Z` or an offset, a
//! naive local date-time, or a bare date). Everything is normalized to a UTC
//! instant, then rendered in a single display timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use nm_core::constants::DEFAULT_DISPLAY_TIMEZONE;
use nm_core::error::{NmError, NmResult};

/// Display format, e.g. `2024-01-15 04:30:00 PST`.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a stored timestamp into a UTC instant.
///
/// A timestamp without an offset is taken as UTC.
pub fn parse_stored_timestamp(raw: &str) -> NmResult<DateTime<Utc>> {
    parse_in_zone(raw, &Utc)
}

/// Parse a date property `start` value, honoring its `time_zone` field.
///
/// Notion only sets `time_zone` when `start` carries no offset; the naive
/// value is then wall-clock time in that zone.
pub fn parse_date_value(start: &str, time_zone: Option<&str>) -> NmResult<DateTime<Utc>> {
    match time_zone {
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|_| NmError::Serialization(format!("unknown time zone '{name}'")))?;
            parse_in_zone(start, &tz)
        }
        None => parse_stored_timestamp(start),
    }
}

fn parse_in_zone<Z: TimeZone>(raw: &str, zone: &Z) -> NmResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| NmError::Serialization(format!("unrecognized timestamp '{raw}'")))?;

    // Wall-clock times inside a DST gap have no mapping; the earlier of an
    // ambiguous pair is used.
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| NmError::Serialization(format!("nonexistent local time '{raw}'")))
}

/// Timezone used for rendering timestamps to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone {
    tz: Tz,
}

impl DisplayZone {
    /// Resolve an IANA zone name such as `America/Los_Angeles`.
    pub fn from_name(name: &str) -> NmResult<Self> {
        let tz: Tz = name
            .trim()
            .parse()
            .map_err(|_| NmError::Config(format!("unknown timezone '{name}'")))?;
        Ok(Self { tz })
    }

    /// IANA name of this zone.
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Convert and format a UTC instant for display.
    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .format(DISPLAY_FORMAT)
            .to_string()
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self {
            tz: DEFAULT_DISPLAY_TIMEZONE
                .parse()
                .unwrap_or(chrono_tz::America::Los_Angeles),
        }
    }
}
