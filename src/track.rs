//! Track accumulation
//!
//! Collects accepted fixes in arrival order and keeps the per-identity
//! message statistics reported alongside the exported document.

use crate::error::ConvertError;
use crate::parser::position::Extraction;
use crate::types::{DecodedMessage, MessageStats, NmeaSentence, PositionFix, Track};

/// Append-only accumulator for one conversion pass
#[derive(Debug, Default)]
pub struct TrackBuilder {
    track: Track,
    stats: MessageStats,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a decoded UBX message, including unparsed and undecodable ones
    pub fn record_message(&mut self, message: &DecodedMessage) {
        self.stats.record(&message.name());
        if message.is_undecodable() {
            self.stats.undecodable_messages += 1;
        }
    }

    pub fn record_nmea(&mut self, sentence: &NmeaSentence<'_>) {
        self.stats.record(&sentence.identity());
    }

    /// Apply the extractor outcome for a message already counted
    pub fn record_extraction(&mut self, extraction: Extraction) {
        match extraction {
            Extraction::Fix(fix) => self.push_fix(fix),
            Extraction::Skipped(reason) => self.stats.record_skip(reason.as_str()),
            Extraction::NotApplicable => {}
        }
    }

    pub fn push_fix(&mut self, fix: PositionFix) {
        self.track.points.push(fix);
    }

    pub fn set_scan_totals(&mut self, corrupt_frames: u32, total_bytes: u64) {
        self.stats.corrupt_frames = corrupt_frames;
        self.stats.total_bytes = total_bytes;
    }

    pub fn point_count(&self) -> usize {
        self.track.len()
    }

    pub fn stats(&self) -> &MessageStats {
        &self.stats
    }

    /// Finish the pass; an empty track is the "no valid position data" failure
    pub fn finish(self) -> Result<(Track, MessageStats), ConvertError> {
        if self.track.is_empty() {
            return Err(ConvertError::NoValidPositionData {
                messages: self.stats.total_messages(),
            });
        }
        Ok((self.track, self.stats))
    }
}
