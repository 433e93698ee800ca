//! UBX Parser Library
//!
//! A Rust library for converting u-blox UBX binary receiver logs into GPX
//! track logs. The whole log is scanned in one forward pass: checksummed UBX
//! frames are decoded, position messages are validated and converted to
//! degrees and meters, and the accepted fixes become one GPX track segment.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export of track points
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable export of conversion statistics in JSON format
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Convert a log held in memory:
//! ```rust,no_run
//! use ubx_parser::{convert_ubx_bytes, ConvertOptions};
//!
//! let data = std::fs::read("COM3_240101_101010.ubx").unwrap();
//! let conversion = convert_ubx_bytes(&data, &ConvertOptions::default()).unwrap();
//! println!("{} track points", conversion.point_count());
//! for (identity, count) in &conversion.stats.counts {
//!     println!("{identity}: {count}");
//! }
//! std::fs::write("track.gpx", &conversion.gpx).unwrap();
//! ```
//!
//! Telling "no usable positions" apart from other failures:
//! ```rust,no_run
//! use ubx_parser::{convert_ubx_file, ConvertOptions};
//! use std::path::Path;
//!
//! match convert_ubx_file(Path::new("log.ubx"), &ConvertOptions::default()) {
//!     Ok(conversion) => println!("{} points", conversion.point_count()),
//!     Err(e) if e.is_no_position_data() => eprintln!("Receiver never had a fix: {e}"),
//!     Err(e) => eprintln!("Conversion failed: {e}"),
//! }
//! ```
//!
//! # Public API
//!
//! ## Conversion Functions
//! - [`convert_ubx_bytes`] - Convert UBX data from memory
//! - [`convert_ubx_file`] - Read and convert a UBX file
//!
//! ## Pipeline Stages
//! - [`FrameScanner`] - Lazy iterator over checksummed frames
//! - [`decode_message`] - Decode a frame into a [`UbxMessage`]
//! - [`extract_position`] - Validate a position message into a [`PositionFix`]
//! - [`track::TrackBuilder`] - Ordered point accumulation and [`MessageStats`]
//! - [`render_gpx`] - Serialize a [`Track`] as GPX 1.1
//!
//! ## Export Functions
//! - [`export_conversion`] - Write all enabled formats
//! - [`export_to_gpx`] - Write the GPX document
//! - [`export_to_csv`] - Write track points as CSV
//! - [`compute_export_paths`] - Helper for consistent path computation

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod track;
pub mod types;

#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;

// Re-export Result type for convenience
pub use anyhow::Result;
