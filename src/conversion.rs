//! Data conversion utilities for UBX parsing
//!
//! Unit conversions from the receiver's scaled integers, UTC timestamp
//! construction and receiver protocol version handling.

use crate::types::MonVer;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use semver::Version;

/// First protocol version that provides NAV-PVT
pub const NAV_PVT_MIN_PROTOCOL: Version = Version::new(14, 0, 0);

/// Convert a 1e-7 degree scaled coordinate to degrees
pub fn convert_scaled_coordinate(raw_value: i32) -> f64 {
    raw_value as f64 * 1e-7
}

/// Convert height from millimeters to meters
pub fn convert_height_mm(raw_value: i32) -> f64 {
    raw_value as f64 / 1000.0
}

/// Convert ground speed from mm/s to m/s
pub fn convert_speed_mm_s(raw_value: i32) -> f64 {
    raw_value as f64 / 1000.0
}

/// Build a UTC timestamp from receiver date/time fields.
///
/// `second` may be 60 during a leap second and `nano` may be negative, so both
/// are applied as offsets from the start of the minute. Returns `None` when
/// the fields do not form a calendar date-time.
pub fn build_utc_timestamp(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nano: i32,
) -> Option<DateTime<Utc>> {
    if second > 60 || !(-1_000_000_000..=1_000_000_000).contains(&nano) {
        return None;
    }

    let minute_start = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
        .and_hms_opt(u32::from(hour), u32::from(minute), 0)?;
    let naive = minute_start
        .checked_add_signed(Duration::seconds(i64::from(second)))?
        .checked_add_signed(Duration::nanoseconds(i64::from(nano)))?;

    Some(Utc.from_utc_datetime(&naive))
}

/// Format a timestamp as GPX `xsd:dateTime` in UTC, e.g. `2025-01-12T12:43:02.25Z`
pub fn format_gpx_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Extract the protocol version from MON-VER extension strings.
///
/// Newer receivers report `PROTVER=18.00`, older ones `PROTVER 14.00`.
pub fn extract_protocol_version(mon_ver: &MonVer) -> Option<Version> {
    mon_ver.extensions.iter().find_map(|ext| {
        let rest = ext.strip_prefix("PROTVER")?;
        let number = rest.trim_start_matches(['=', ' ']).trim();
        let mut parts = number.split('.');
        let major = parts.next()?.parse::<u64>().ok()?;
        let minor = parts.next().unwrap_or("0").parse::<u64>().ok()?;
        Some(Version::new(major, minor, 0))
    })
}

/// Whether a receiver speaking `protocol` can output NAV-PVT
pub fn supports_nav_pvt(protocol: &Version) -> bool {
    *protocol >= NAV_PVT_MIN_PROTOCOL
}
