use chrono::{DateTime, NaiveDateTime, Utc};

use super::error::EphemerisError;

/// Day-of-year layout of an epoch once the fractional seconds and the
/// trailing `Z` have been cut off.
const EPOCH_FORMAT: &str = "%Y-%jT%H:%M:%S";

/// Parse an ephemeris epoch such as `2024-045T12:00:00.000Z`.
///
/// Sub-second precision is discarded, so two epochs inside the same second
/// resolve to the same instant.
pub fn parse_epoch(epoch: &str) -> Result<DateTime<Utc>, EphemerisError> {
    let trimmed = epoch.trim();
    let whole_seconds = match trimmed.find('.') {
        Some(idx) => &trimmed[..idx],
        None => trimmed.trim_end_matches('Z'),
    };

    NaiveDateTime::parse_from_str(whole_seconds, EPOCH_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| EphemerisError::InvalidEpoch {
            epoch: epoch.to_string(),
            reason: e.to_string(),
        })
}

/// Format an instant in the canonical key format, `YYYY-DDDTHH:MM:SS.sssZ`.
pub fn format_epoch(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%jT%H:%M:%S%.3fZ").to_string()
}
