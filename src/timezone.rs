//! Resolving the server's configured timezone.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset of `canonical_timezone`, e.g. "Asia/Jakarta".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Check that `canonical_timezone` names a timezone that [get_local_offset] can resolve.
pub fn is_valid_timezone(canonical_timezone: &str) -> bool {
    time_tz::timezones::get_by_name(canonical_timezone).is_some()
}
