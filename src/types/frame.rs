use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// UBX synchronization characters
pub const UBX_SYNC_1: u8 = 0xB5;
pub const UBX_SYNC_2: u8 = 0x62;

/// Bytes surrounding the payload: sync(2) + class(1) + id(1) + length(2) + checksum(2)
pub const UBX_FRAME_OVERHEAD: usize = 8;

/// A checksum-validated UBX frame borrowed from the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame<'a> {
    /// Offset of the first sync byte within the scanned buffer
    pub offset: usize,
    pub class: u8,
    pub id: u8,
    pub declared_length: u16,
    pub payload: &'a [u8],
    pub checksum: [u8; 2],
}

impl<'a> RawFrame<'a> {
    /// Total number of bytes this frame occupies in the buffer
    pub fn frame_len(&self) -> usize {
        self.payload.len() + UBX_FRAME_OVERHEAD
    }
}

/// An NMEA sentence found between UBX frames.
///
/// Only identified for statistics; never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NmeaSentence<'a> {
    pub offset: usize,
    /// Sentence text between `$` and `*`, e.g. `GNGGA,123519,...`
    pub body: &'a str,
}

impl<'a> NmeaSentence<'a> {
    /// Address field of the sentence (`GNGGA`)
    pub fn address(&self) -> &'a str {
        self.body.split(',').next().unwrap_or_default()
    }

    pub fn identity(&self) -> String {
        format!("NMEA-{}", self.address())
    }
}

/// One unit produced by the frame scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedFrame<'a> {
    Ubx(RawFrame<'a>),
    Nmea(NmeaSentence<'a>),
}

impl<'a> ScannedFrame<'a> {
    pub fn offset(&self) -> usize {
        match self {
            ScannedFrame::Ubx(frame) => frame.offset,
            ScannedFrame::Nmea(sentence) => sentence.offset,
        }
    }
}

/// Counters collected while scanning, decoding and extracting
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageStats {
    /// Occurrences per message identity (`NAV-PVT`, `NMEA-GNGGA`, ...)
    pub counts: BTreeMap<String, u32>,
    /// Sync markers that did not lead to a valid frame (bad checksum or truncated)
    pub corrupt_frames: u32,
    /// Known messages whose payload did not match the expected layout
    pub undecodable_messages: u32,
    /// Position messages that were rejected, keyed by skip reason
    pub skipped_fixes: BTreeMap<String, u32>,
    pub total_bytes: u64,
}

impl MessageStats {
    pub fn record(&mut self, identity: &str) {
        *self.counts.entry(identity.to_string()).or_insert(0) += 1;
    }

    pub fn record_skip(&mut self, reason: &str) {
        *self.skipped_fixes.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, identity: &str) -> u32 {
        self.counts.get(identity).copied().unwrap_or(0)
    }

    /// Total number of identified messages and sentences
    pub fn total_messages(&self) -> u32 {
        self.counts.values().sum()
    }
}
