//! CLI binary for UBX Parser
//!
//! Converts UBX receiver logs to GPX (and optionally CSV / JSON statistics).

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use glob::glob;
use std::path::{Path, PathBuf};
use ubx_parser::{
    convert_ubx_file, export_conversion, ConvertError, ConvertOptions, ExportOptions,
    PositionSource, ProtocolFilter,
};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["ubx", "bin", "log"];

const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

fn build_command() -> Command {
    Command::new("UBX Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert u-blox UBX binary logs to GPX track files.")
        .arg(
            Arg::new("files")
                .help(
                    "UBX files to convert (.ubx, .bin, .log, case-insensitive, supports globbing)",
                )
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("gpx")
                .long("gpx")
                .help("Export the track to a GPX file (default when no format is selected)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export track points to a CSV file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Export point count and message statistics to a .stats.json file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("nmea")
                .long("nmea")
                .help("Also identify NMEA sentences and include them in message statistics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("posllh")
                .long("posllh")
                .help("Take positions from NAV-POSLLH instead of NAV-PVT (points carry no time)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("min-sats")
                .long("min-sats")
                .help("Skip NAV-PVT fixes with fewer satellites than this")
                .value_name("N")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .help("Track name written to the GPX file (default: input file name)")
                .value_name("NAME"),
        )
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Expand glob patterns and keep existing files with a supported extension
fn collect_input_paths(patterns: &[&String], debug: bool) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();

    for pattern in patterns {
        if debug {
            println!("Processing pattern: {pattern}");
        }

        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(paths) => {
                        if debug {
                            println!("Glob pattern '{pattern}' matched {} files", paths.len());
                        }
                        paths
                    }
                    Err(e) => {
                        eprintln!("Error expanding glob pattern '{pattern}': {e}");
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![PathBuf::from(pattern)]
        };

        for path in paths {
            if !path.exists() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }

            if !has_supported_extension(&path) {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("none");
                eprintln!("Warning: Skipping file with unsupported extension '{ext}': {path:?}");
                continue;
            }

            valid_paths.push(path);
        }
    }

    valid_paths
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    let export_csv = matches.get_flag("csv");
    let export_json = matches.get_flag("json");
    let export_gpx = matches.get_flag("gpx") || (!export_csv && !export_json);
    let track_name = matches.get_one::<String>("name").cloned();
    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|files| files.collect())
        .unwrap_or_default();

    let export_options = ExportOptions {
        gpx: export_gpx,
        csv: export_csv,
        json: export_json,
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let base_options = ConvertOptions {
        protocols: ProtocolFilter {
            ubx: true,
            nmea: matches.get_flag("nmea"),
        },
        position_source: if matches.get_flag("posllh") {
            PositionSource::NavPosllh
        } else {
            PositionSource::NavPvt
        },
        min_satellites: matches.get_one::<u8>("min-sats").copied(),
        debug,
        ..ConvertOptions::default()
    };

    if debug {
        println!("UBX Parser {} ({GIT_SHA})", env!("CARGO_PKG_VERSION"));
        println!("Input patterns: {file_patterns:?}");
    }

    let valid_paths = collect_input_paths(&file_patterns, debug);

    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Supported extensions: .ubx, .bin, .log (case-insensitive)");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;

    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        let options = ConvertOptions {
            track_name: track_name.clone().or_else(|| {
                path.file_stem()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
            }),
            ..base_options.clone()
        };

        let conversion = match convert_ubx_file(path, &options) {
            Ok(conversion) => conversion,
            Err(ConvertError::NoValidPositionData { messages }) => {
                eprintln!("No valid position data in {filename} ({messages} messages scanned).");
                eprintln!("The receiver may not have had a fix, or NAV-PVT output is disabled.");
                eprintln!("Continuing with next file...");
                continue;
            }
            Err(e) => {
                eprintln!("Error processing {filename}: {e}");
                eprintln!("Continuing with next file...");
                continue;
            }
        };

        println!("  Track points: {}", conversion.point_count());
        if let Some(version) = &conversion.protocol_version {
            println!("  Protocol version: {version}");
        }
        if conversion.stats.corrupt_frames > 0 {
            println!("  Corrupt frames dropped: {}", conversion.stats.corrupt_frames);
        }
        println!("  Messages:");
        for (identity, count) in &conversion.stats.counts {
            println!("    {identity}: {count}");
        }

        match export_conversion(&conversion, path, &export_options) {
            Ok(report) => {
                for written in [&report.gpx_path, &report.csv_path, &report.json_path]
                    .into_iter()
                    .flatten()
                {
                    println!("  Exported: {}", written.display());
                }
                processed_files += 1;
            }
            Err(e) => {
                eprintln!("Error exporting {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully converted out of {} files found.",
            valid_paths.len()
        );
        eprintln!("This could be due to:");
        eprintln!("  - Files not being UBX binary logs");
        eprintln!("  - Receiver without a position fix for the whole log");
        eprintln!("  - NAV-PVT output disabled on the receiver (try --posllh)");
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}
