//! Provider timestamp handling.
//!
//! Score and play-by-play feeds send naive wall-clock strings ("2025-10-01T21:08:00")
//! in the provider's zone; Twitter sends real UTC instants.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const PROVIDER_TZ: Tz = chrono_tz::America::New_York;

const TWITTER_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Convert a provider-local timestamp to UTC after shifting it by `shift`.
///
/// Strings that carry their own offset are taken at face value.
pub fn provider_to_utc(raw: &str, provider_tz: Tz, shift: Duration) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc) + shift);
    }
    let naive = raw.parse::<NaiveDateTime>().ok()? + shift;
    localize(naive, provider_tz)
}

/// Parse an instant that is already UTC-equivalent.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(instant) = DateTime::parse_from_str(raw, TWITTER_FORMAT) {
        return Some(instant.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

/// Calendar date of a provider timestamp read as UTC and viewed in `display_tz`.
pub fn utc_to_local_date(raw: &str, display_tz: Tz) -> Option<NaiveDate> {
    parse_utc(raw).map(|instant| instant.with_timezone(&display_tz).date_naive())
}

/// Calendar date taken verbatim from the text before the `T`.
pub fn verbatim_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    // Wall-clock times inside a spring-forward gap do not exist; nudge them past it.
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
}
