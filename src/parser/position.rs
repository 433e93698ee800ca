//! Position extraction
//!
//! Turns decoded NAV-PVT / NAV-POSLLH messages into validated [`PositionFix`]
//! values. Every rejection is an explicit [`SkipReason`] so one bad message
//! never aborts a conversion.

use crate::conversion::{
    build_utc_timestamp, convert_height_mm, convert_scaled_coordinate, convert_speed_mm_s,
};
use crate::types::{
    ConvertOptions, DecodedMessage, NavPosllh, NavPvt, PositionFix, PositionSource, UbxMessage,
};
use std::fmt;

/// Why a position message did not produce a fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkipReason {
    /// Raw latitude and longitude both zero: receiver has no fix yet
    NoFix,
    /// Converted coordinate or height outside its valid range
    OutOfRange,
    /// Date/time flagged valid but the fields do not form a date-time
    InvalidTimestamp,
    TooFewSatellites,
    /// Payload did not match the message layout
    Undecodable,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoFix => "no-fix",
            SkipReason::OutOfRange => "out-of-range",
            SkipReason::InvalidTimestamp => "invalid-timestamp",
            SkipReason::TooFewSatellites => "too-few-satellites",
            SkipReason::Undecodable => "undecodable",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running the extractor on one message
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Message is not the configured position source
    NotApplicable,
    Skipped(SkipReason),
    Fix(PositionFix),
}

/// Extract a position fix from a decoded message
pub fn extract_position(message: &DecodedMessage, options: &ConvertOptions) -> Extraction {
    if message.identity != options.position_source.identity() {
        return Extraction::NotApplicable;
    }

    let result = match (&message.message, options.position_source) {
        (UbxMessage::NavPvt(pvt), PositionSource::NavPvt) => {
            extract_nav_pvt(pvt, options.min_satellites)
        }
        (UbxMessage::NavPosllh(pos), PositionSource::NavPosllh) => extract_nav_posllh(pos),
        (UbxMessage::Undecodable { .. }, _) => Err(SkipReason::Undecodable),
        _ => return Extraction::NotApplicable,
    };

    match result {
        Ok(fix) => Extraction::Fix(fix),
        Err(reason) => Extraction::Skipped(reason),
    }
}

pub fn extract_nav_pvt(
    pvt: &NavPvt,
    min_satellites: Option<u8>,
) -> Result<PositionFix, SkipReason> {
    let (latitude, longitude, elevation) = convert_position(pvt.lat, pvt.lon, pvt.height)?;

    if let Some(min) = min_satellites {
        if pvt.num_sv < min {
            return Err(SkipReason::TooFewSatellites);
        }
    }

    let time = if pvt.has_valid_date_time() {
        Some(
            build_utc_timestamp(
                pvt.year, pvt.month, pvt.day, pvt.hour, pvt.min, pvt.sec, pvt.nano,
            )
            .ok_or(SkipReason::InvalidTimestamp)?,
        )
    } else {
        None
    };

    Ok(PositionFix {
        latitude,
        longitude,
        elevation,
        time,
        num_sats: Some(pvt.num_sv),
        speed: Some(convert_speed_mm_s(pvt.g_speed)),
    })
}

pub fn extract_nav_posllh(pos: &NavPosllh) -> Result<PositionFix, SkipReason> {
    let (latitude, longitude, elevation) = convert_position(pos.lat, pos.lon, pos.height)?;

    Ok(PositionFix {
        latitude,
        longitude,
        elevation,
        time: None,
        num_sats: None,
        speed: None,
    })
}

/// Convert raw lat/lon/height and apply the sentinel and range rules
fn convert_position(
    lat_raw: i32,
    lon_raw: i32,
    height_raw: i32,
) -> Result<(f64, f64, f64), SkipReason> {
    if lat_raw == 0 && lon_raw == 0 {
        return Err(SkipReason::NoFix);
    }

    let latitude = convert_scaled_coordinate(lat_raw);
    let longitude = convert_scaled_coordinate(lon_raw);
    let elevation = convert_height_mm(height_raw);

    if !latitude.is_finite()
        || !longitude.is_finite()
        || !elevation.is_finite()
        || !(-90.0..=90.0).contains(&latitude)
        || !(-180.0..=180.0).contains(&longitude)
    {
        return Err(SkipReason::OutOfRange);
    }

    Ok((latitude, longitude, elevation))
}
