use crate::types::MessageStats;
use chrono::{DateTime, Duration, Utc};
use semver::Version;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A validated position sample ready for export
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionFix {
    /// Degrees, -90..=90
    pub latitude: f64,
    /// Degrees, -180..=180
    pub longitude: f64,
    /// Meters above the ellipsoid
    pub elevation: f64,
    pub time: Option<DateTime<Utc>>,
    pub num_sats: Option<u8>,
    /// Ground speed in m/s
    pub speed: Option<f64>,
}

/// Geographic extent of a track
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackBounds {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

/// Accepted fixes in input stream order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    pub points: Vec<PositionFix>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Option<TrackBounds> {
        let first = self.points.first()?;
        let initial = TrackBounds {
            min_latitude: first.latitude,
            min_longitude: first.longitude,
            max_latitude: first.latitude,
            max_longitude: first.longitude,
        };

        Some(self.points.iter().skip(1).fold(initial, |b, p| TrackBounds {
            min_latitude: b.min_latitude.min(p.latitude),
            min_longitude: b.min_longitude.min(p.longitude),
            max_latitude: b.max_latitude.max(p.latitude),
            max_longitude: b.max_longitude.max(p.longitude),
        }))
    }

    /// First and last timestamp present in the track
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut times = self.points.iter().filter_map(|p| p.time);
        let first = times.next()?;
        let last = times.last().unwrap_or(first);
        Some((first, last))
    }

    pub fn time_span(&self) -> Option<Duration> {
        self.time_range().map(|(first, last)| last - first)
    }
}

/// Successful result of a conversion run
#[derive(Debug, Clone)]
pub struct Conversion {
    /// GPX 1.1 document text
    pub gpx: String,
    pub track: Track,
    pub stats: MessageStats,
    /// Protocol version reported by MON-VER, when the log contains one
    pub protocol_version: Option<Version>,
}

impl Conversion {
    pub fn point_count(&self) -> usize {
        self.track.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fix(latitude: f64, longitude: f64, second: Option<u32>) -> PositionFix {
        PositionFix {
            latitude,
            longitude,
            elevation: 0.0,
            time: second.map(|s| Utc.with_ymd_and_hms(2025, 1, 12, 12, 43, s).unwrap()),
            num_sats: None,
            speed: None,
        }
    }

    #[test]
    fn test_bounds_and_time_span() {
        let track = Track {
            points: vec![
                fix(48.1, 11.5, Some(1)),
                fix(47.9, 11.7, None),
                fix(48.0, 11.4, Some(31)),
            ],
        };

        let bounds = track.bounds().unwrap();
        assert_eq!(bounds.min_latitude, 47.9);
        assert_eq!(bounds.max_latitude, 48.1);
        assert_eq!(bounds.min_longitude, 11.4);
        assert_eq!(bounds.max_longitude, 11.7);
        assert_eq!(track.time_span(), Some(Duration::seconds(30)));
    }

    #[test]
    fn test_empty_track_has_no_summary() {
        let track = Track::new();
        assert!(track.bounds().is_none());
        assert!(track.time_span().is_none());
    }
}
