use crate::conversion::{extract_protocol_version, supports_nav_pvt};
use crate::error::ConvertError;
use crate::export::render_gpx;
use crate::parser::decoder::decode_message;
use crate::parser::position::{extract_position, Extraction};
use crate::parser::stream::FrameScanner;
use crate::track::TrackBuilder;
use crate::types::{Conversion, ConvertOptions, ScannedFrame, UbxMessage};
use std::path::Path;

/// Read a UBX log file and convert it to a GPX track
pub fn convert_ubx_file(
    file_path: &Path,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    if options.debug {
        println!("=== CONVERTING UBX FILE ===");
        println!("File: {:?}", file_path);
    }

    let file_data = std::fs::read(file_path)?;
    convert_ubx_bytes(&file_data, options)
}

/// Convert an in-memory UBX log to a GPX track.
///
/// Single forward pass: frames are scanned, decoded, filtered to the
/// configured position message and accumulated in stream order. Corrupt
/// frames, undecodable messages and rejected fixes are counted in the stats;
/// only an empty track fails the conversion. The same input always yields
/// the same document.
pub fn convert_ubx_bytes(
    data: &[u8],
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    if options.debug {
        println!("=== PARSING UBX DATA ===");
        println!("Data size: {} bytes", data.len());
    }

    let mut scanner = FrameScanner::new(data, options.protocols, options.debug);
    let mut builder = TrackBuilder::new();
    let mut protocol_version = None;

    for frame in scanner.by_ref() {
        let frame = match frame {
            ScannedFrame::Ubx(frame) => frame,
            ScannedFrame::Nmea(sentence) => {
                builder.record_nmea(&sentence);
                continue;
            }
        };

        let message = decode_message(&frame);
        builder.record_message(&message);

        match &message.message {
            UbxMessage::MonVer(ver) => {
                protocol_version = extract_protocol_version(ver).or(protocol_version);
                if options.debug {
                    println!(
                        "DEBUG: MON-VER sw: {}, hw: {}, extensions: {:?}",
                        ver.sw_version, ver.hw_version, ver.extensions
                    );
                }
            }
            UbxMessage::Inf(text) if options.debug => {
                println!("DEBUG: {} at offset {}: {}", message.name(), message.offset, text);
            }
            UbxMessage::Undecodable { reason } if options.debug => {
                println!("DEBUG: Undecodable message at offset {}: {}", message.offset, reason);
            }
            _ => {}
        }

        let extraction = extract_position(&message, options);
        if options.debug {
            if let Extraction::Skipped(reason) = &extraction {
                println!(
                    "DEBUG: Skipped {} at offset {}: {}",
                    message.name(),
                    message.offset,
                    reason
                );
            }
        }
        builder.record_extraction(extraction);
    }

    builder.set_scan_totals(scanner.corrupt_frames, data.len() as u64);

    if options.debug {
        let stats = builder.stats();
        println!(
            "Scanned {} messages, {} corrupt frames, {} points accepted",
            stats.total_messages(),
            stats.corrupt_frames,
            builder.point_count()
        );
        for (identity, count) in &stats.counts {
            println!("  {identity}: {count}");
        }
        if let Some(version) = &protocol_version {
            if !supports_nav_pvt(version) {
                println!("DEBUG: Receiver protocol {version} predates NAV-PVT");
            }
        }
    }

    let (track, stats) = builder.finish()?;
    let gpx = render_gpx(&track, options)?;

    Ok(Conversion {
        gpx,
        track,
        stats,
        protocol_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_position_data() {
        let err = convert_ubx_bytes(&[], &ConvertOptions::default()).unwrap_err();
        assert!(err.is_no_position_data());
    }

    #[test]
    fn test_noise_has_no_position_data() {
        let noise: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        match convert_ubx_bytes(&noise, &ConvertOptions::default()) {
            Err(ConvertError::NoValidPositionData { messages }) => assert_eq!(messages, 0),
            other => panic!("expected NoValidPositionData, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = convert_ubx_file(
            Path::new("/nonexistent/dir/log.ubx"),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }
}
