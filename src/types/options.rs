use crate::types::MessageIdentity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which protocol families the scanner reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtocolFilter {
    pub ubx: bool,
    /// Identify NMEA sentences for statistics (never decoded into fixes)
    pub nmea: bool,
}

impl ProtocolFilter {
    pub const UBX_ONLY: ProtocolFilter = ProtocolFilter {
        ubx: true,
        nmea: false,
    };
}

impl Default for ProtocolFilter {
    fn default() -> Self {
        Self::UBX_ONLY
    }
}

/// Message type that track points are taken from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PositionSource {
    #[default]
    NavPvt,
    /// NAV-POSLLH carries no date, so its points have no timestamp
    NavPosllh,
}

impl PositionSource {
    pub fn identity(&self) -> MessageIdentity {
        match self {
            PositionSource::NavPvt => MessageIdentity::NAV_PVT,
            PositionSource::NavPosllh => MessageIdentity::NAV_POSLLH,
        }
    }
}

/// Options for converting a UBX log into a track
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub protocols: ProtocolFilter,
    pub position_source: PositionSource,
    /// Skip NAV-PVT fixes reporting fewer satellites than this
    pub min_satellites: Option<u8>,
    pub track_name: Option<String>,
    pub creator: String,
    pub debug: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            protocols: ProtocolFilter::default(),
            position_source: PositionSource::default(),
            min_satellites: None,
            track_name: None,
            creator: "UBX Parser (Rust)".to_string(),
            debug: false,
        }
    }
}
