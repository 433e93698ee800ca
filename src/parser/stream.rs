use crate::parser::helpers::{nmea_checksum, parse_hex_byte, read_u16_le, ubx_checksum};
use crate::types::{
    NmeaSentence, ProtocolFilter, RawFrame, ScannedFrame, UBX_FRAME_OVERHEAD, UBX_SYNC_1,
    UBX_SYNC_2,
};

/// Longest NMEA sentence accepted, including `$` and line ending.
/// The standard allows 82 characters; some receivers emit longer proprietary sentences.
const MAX_NMEA_SENTENCE_LEN: usize = 128;

/// Start-of-frame markers the stream can search for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMarker {
    Ubx,
    Nmea,
}

/// Reasons a UBX sync marker did not lead to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRejection {
    /// Fewer bytes remain than the header declares
    Truncated { declared: usize, available: usize },
    ChecksumMismatch { expected: [u8; 2], found: [u8; 2] },
}

/// Forward-only cursor over a UBX log buffer
pub struct UbxDataStream<'a> {
    data: &'a [u8],
    pub pos: usize,
    end: usize,
    pub eof: bool,
}

impl<'a> UbxDataStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
            eof: data.is_empty(),
        }
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
        self.eof = self.pos >= self.end;
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        if self.pos < self.end {
            let byte = self.data[self.pos];
            self.pos += 1;
            Some(byte)
        } else {
            self.eof = true;
            None
        }
    }

    /// Borrow `len` bytes from the buffer and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if len > self.remaining() {
            self.eof = true;
            return None;
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        self.eof = self.pos >= self.end;
        Some(bytes)
    }

    /// Skip ahead until a frame marker starts at the current position.
    ///
    /// Leaves the position on the first marker byte. UBX needs both sync
    /// characters; NMEA is recognised by `$` only when `nmea` is set.
    pub fn skip_to_next_marker(&mut self, ubx: bool, nmea: bool) -> Option<FrameMarker> {
        while self.pos < self.end {
            let byte = self.data[self.pos];

            if ubx
                && byte == UBX_SYNC_1
                && self.data.get(self.pos + 1).copied() == Some(UBX_SYNC_2)
            {
                return Some(FrameMarker::Ubx);
            }
            if nmea && byte == b'$' {
                return Some(FrameMarker::Nmea);
            }

            self.pos += 1;
        }

        self.eof = true;
        None
    }
}

/// Lazy single-pass iterator over the frames of a UBX log buffer.
///
/// Corrupt frames are dropped and scanning resumes one byte after the start of
/// the rejected sync marker, since the declared length of a bad frame cannot
/// be trusted.
pub struct FrameScanner<'a> {
    stream: UbxDataStream<'a>,
    protocols: ProtocolFilter,
    debug: bool,
    /// Sync markers that did not yield a valid frame
    pub corrupt_frames: u32,
}

impl<'a> FrameScanner<'a> {
    pub fn new(data: &'a [u8], protocols: ProtocolFilter, debug: bool) -> Self {
        Self::with_offset(data, 0, protocols, debug)
    }

    pub fn with_offset(
        data: &'a [u8],
        start: usize,
        protocols: ProtocolFilter,
        debug: bool,
    ) -> Self {
        let mut stream = UbxDataStream::new(data);
        stream.set_position(start);
        Self {
            stream,
            protocols,
            debug,
            corrupt_frames: 0,
        }
    }

    /// Read one UBX frame whose sync marker starts at the current position
    fn read_ubx_frame(&mut self) -> Result<RawFrame<'a>, FrameRejection> {
        let offset = self.stream.pos;
        let available = self.stream.remaining();

        // Header: sync(2) + class + id + length(2)
        let header = self
            .stream
            .read_bytes(6)
            .ok_or(FrameRejection::Truncated {
                declared: UBX_FRAME_OVERHEAD,
                available,
            })?;
        let class = header[2];
        let id = header[3];
        let declared_length = read_u16_le(header, 4).unwrap_or_default();

        let truncated = FrameRejection::Truncated {
            declared: declared_length as usize + UBX_FRAME_OVERHEAD,
            available,
        };
        let payload = self
            .stream
            .read_bytes(declared_length as usize)
            .ok_or(truncated)?;
        let trailer = self.stream.read_bytes(2).ok_or(truncated)?;
        let found = [trailer[0], trailer[1]];

        let expected = ubx_checksum(class, id, payload);
        if expected != found {
            return Err(FrameRejection::ChecksumMismatch { expected, found });
        }

        Ok(RawFrame {
            offset,
            class,
            id,
            declared_length,
            payload,
            checksum: found,
        })
    }

    /// Read one checksummed NMEA sentence starting at `$`
    fn read_nmea_sentence(&mut self) -> Option<NmeaSentence<'a>> {
        let offset = self.stream.pos;
        let window_len = self.stream.remaining().min(MAX_NMEA_SENTENCE_LEN);
        let window = self.stream.read_bytes(window_len)?;

        let line_end = window.iter().position(|&b| b == b'\n')?;
        let line = &window[1..line_end];
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        let star = line.iter().rposition(|&b| b == b'*')?;
        let body = &line[..star];
        if body.is_empty() || !body.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return None;
        }
        if parse_hex_byte(&line[star + 1..])? != nmea_checksum(body) {
            return None;
        }

        self.stream.set_position(offset + line_end + 1);
        Some(NmeaSentence {
            offset,
            body: std::str::from_utf8(body).ok()?,
        })
    }
}

impl<'a> Iterator for FrameScanner<'a> {
    type Item = ScannedFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let marker = self
                .stream
                .skip_to_next_marker(self.protocols.ubx, self.protocols.nmea)?;
            let start = self.stream.pos;

            match marker {
                FrameMarker::Ubx => match self.read_ubx_frame() {
                    Ok(frame) => return Some(ScannedFrame::Ubx(frame)),
                    Err(rejection) => {
                        self.corrupt_frames += 1;
                        if self.debug {
                            println!("DEBUG: Dropped UBX frame at offset {start}: {rejection:?}");
                        }
                    }
                },
                FrameMarker::Nmea => {
                    if let Some(sentence) = self.read_nmea_sentence() {
                        return Some(ScannedFrame::Nmea(sentence));
                    }
                }
            }

            self.stream.set_position(start + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_frame(class: u8, id: u8, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![UBX_SYNC_1, UBX_SYNC_2, class, id];
        frame.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&ubx_checksum(class, id, payload));
        frame
    }

    fn ubx_frames(data: &[u8]) -> Vec<RawFrame<'_>> {
        FrameScanner::new(data, ProtocolFilter::UBX_ONLY, false)
            .filter_map(|f| match f {
                ScannedFrame::Ubx(frame) => Some(frame),
                ScannedFrame::Nmea(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_buffer_yields_nothing() {
        let mut scanner = FrameScanner::new(&[], ProtocolFilter::UBX_ONLY, false);
        assert!(scanner.next().is_none());
        assert_eq!(scanner.corrupt_frames, 0);
    }

    #[test]
    fn test_frames_between_noise() {
        let mut data = vec![0x00, 0xB5, 0x13, 0x37];
        data.extend(build_frame(0x01, 0x07, &[1, 2, 3]));
        data.extend([0xFF, 0x62]);
        data.extend(build_frame(0x0A, 0x04, &[]));

        let frames = ubx_frames(&data);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].offset, 4);
        assert_eq!((frames[0].class, frames[0].id), (0x01, 0x07));
        assert_eq!(frames[0].payload, &[1, 2, 3]);
        assert_eq!(frames[0].declared_length, 3);
        assert_eq!((frames[1].class, frames[1].id), (0x0A, 0x04));
        assert_eq!(frames[1].offset, 4 + frames[0].frame_len() + 2);
    }

    #[test]
    fn test_bad_checksum_dropped_and_scan_resyncs() {
        let mut bad = build_frame(0x01, 0x07, &[9, 9, 9, 9]);
        let last = bad.len() - 1;
        bad[last] ^= 0x55;

        let mut data = bad;
        data.extend(build_frame(0x01, 0x02, &[7]));

        let mut scanner = FrameScanner::new(&data, ProtocolFilter::UBX_ONLY, false);
        let frames: Vec<_> = scanner.by_ref().collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(scanner.corrupt_frames, 1);
        match &frames[0] {
            ScannedFrame::Ubx(frame) => assert_eq!(frame.id, 0x02),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn test_frame_hidden_inside_corrupt_length_is_found() {
        // A corrupt header claiming a long payload must not swallow the next frame
        let inner = build_frame(0x01, 0x07, &[4, 5, 6]);
        let mut data = vec![UBX_SYNC_1, UBX_SYNC_2, 0x01, 0x07, 0x40, 0x00];
        data.extend(&inner);
        data.extend([0u8; 64]);

        let frames = ubx_frames(&data);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].offset, 6);
        assert_eq!(frames[0].payload, &[4, 5, 6]);
    }

    #[test]
    fn test_truncated_trailing_frame_dropped() {
        let mut data = build_frame(0x01, 0x07, &[1, 2]);
        let mut tail = build_frame(0x01, 0x07, &[3, 4, 5, 6]);
        tail.truncate(tail.len() - 3);
        data.extend(tail);

        let mut scanner = FrameScanner::new(&data, ProtocolFilter::UBX_ONLY, false);
        assert_eq!(scanner.by_ref().count(), 1);
        assert_eq!(scanner.corrupt_frames, 1);
    }

    #[test]
    fn test_nmea_ignored_unless_enabled() {
        let sentence = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
        let mut data = sentence.to_vec();
        data.extend(build_frame(0x01, 0x07, &[1]));

        assert_eq!(ubx_frames(&data).len(), 1);

        let filter = ProtocolFilter {
            ubx: true,
            nmea: true,
        };
        let frames: Vec<_> = FrameScanner::new(&data, filter, false).collect();
        assert_eq!(frames.len(), 2);
        match &frames[0] {
            ScannedFrame::Nmea(s) => {
                assert_eq!(s.identity(), "NMEA-GPGGA");
                assert_eq!(s.offset, 0);
            }
            other => panic!("expected NMEA sentence, got {other:?}"),
        }
        assert_eq!(frames[1].offset(), sentence.len());
    }

    #[test]
    fn test_nmea_with_bad_checksum_skipped() {
        let data = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*48\r\n";
        let filter = ProtocolFilter {
            ubx: true,
            nmea: true,
        };
        assert_eq!(FrameScanner::new(data, filter, false).count(), 0);
    }

    #[test]
    fn test_scan_from_offset() {
        let first = build_frame(0x01, 0x07, &[1]);
        let mut data = first.clone();
        data.extend(build_frame(0x01, 0x02, &[2]));

        let frames: Vec<_> =
            FrameScanner::with_offset(&data, first.len(), ProtocolFilter::UBX_ONLY, false)
                .collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].offset(), first.len());
    }
}
