//! Export functionality for converted UBX tracks
//!
//! [`render_gpx`] is the document emitter used by the conversion pipeline.
//! The `export_*` functions write a finished [`Conversion`] to GPX, CSV and
//! JSON files next to the input log or into a chosen output directory.

use crate::conversion::format_gpx_timestamp;
use crate::types::{Conversion, ConvertOptions, Track};
use crate::Result;
use anyhow::Context;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const DEFAULT_TRACK_NAME: &str = "UBX track log";

/// Export options for controlling output formats
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub gpx: bool,
    pub csv: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            gpx: true,
            csv: false,
            json: false,
            output_dir: None,
        }
    }
}

/// Output paths derived from an input file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub gpx: PathBuf,
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Files written by [`export_conversion`]
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub gpx_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Serialize a track as a GPX 1.1 document with one track and one segment.
///
/// Points are written in track order without reordering or deduplication;
/// `<time>` is omitted for points without a timestamp.
pub fn render_gpx(
    track: &Track,
    options: &ConvertOptions,
) -> std::result::Result<String, std::fmt::Error> {
    let name = escape_xml(options.track_name.as_deref().unwrap_or(DEFAULT_TRACK_NAME));
    let mut doc = String::with_capacity(256 + track.len() * 128);

    writeln!(doc, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        doc,
        r#"<gpx creator="{}" version="1.1" xmlns="http://www.topografix.com/GPX/1/1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#,
        escape_xml(&options.creator)
    )?;

    write!(doc, "<metadata><name>{}</name>", name)?;
    if let Some(bounds) = track.bounds() {
        write!(
            doc,
            r#"<bounds minlat="{:.7}" minlon="{:.7}" maxlat="{:.7}" maxlon="{:.7}"/>"#,
            bounds.min_latitude, bounds.min_longitude, bounds.max_latitude, bounds.max_longitude
        )?;
    }
    writeln!(doc, "</metadata>")?;

    writeln!(doc, "<trk><name>{}</name><trkseg>", name)?;
    for point in &track.points {
        write!(
            doc,
            r#"  <trkpt lat="{:.7}" lon="{:.7}"><ele>{:.3}</ele>"#,
            point.latitude, point.longitude, point.elevation
        )?;
        if let Some(time) = &point.time {
            write!(doc, "<time>{}</time>", format_gpx_timestamp(time))?;
        }
        if let Some(num_sats) = point.num_sats {
            write!(doc, "<sat>{}</sat>", num_sats)?;
        }
        writeln!(doc, "</trkpt>")?;
    }
    writeln!(doc, "</trkseg></trk>")?;
    writeln!(doc, "</gpx>")?;

    Ok(doc)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Compute output paths for an input log.
///
/// Files go to `output_dir` when set, otherwise next to the input file.
pub fn compute_export_paths(input_path: &Path, export_options: &ExportOptions) -> ExportPaths {
    let base_name = input_path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let output_dir = match &export_options.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    ExportPaths {
        gpx: output_dir.join(format!("{}.gpx", base_name)),
        csv: output_dir.join(format!("{}.csv", base_name)),
        json: output_dir.join(format!("{}.stats.json", base_name)),
    }
}

/// Write every format enabled in `export_options`
pub fn export_conversion(
    conversion: &Conversion,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    let paths = compute_export_paths(input_path, export_options);
    let mut report = ExportReport::default();

    if export_options.gpx {
        export_to_gpx(conversion, &paths.gpx)?;
        report.gpx_path = Some(paths.gpx.clone());
    }

    if export_options.csv {
        #[cfg(feature = "csv")]
        {
            export_to_csv(&conversion.track, &paths.csv)?;
            report.csv_path = Some(paths.csv.clone());
        }
        #[cfg(not(feature = "csv"))]
        anyhow::bail!("CSV export requires the `csv` feature");
    }

    if export_options.json {
        #[cfg(feature = "json")]
        {
            export_report_json(conversion, &paths.json)?;
            report.json_path = Some(paths.json.clone());
        }
        #[cfg(not(feature = "json"))]
        anyhow::bail!("JSON export requires the `json` feature");
    }

    Ok(report)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }
    }
    Ok(())
}

/// Write the GPX document of a conversion
pub fn export_to_gpx(conversion: &Conversion, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    std::fs::write(output_path, &conversion.gpx)
        .with_context(|| format!("Failed to write GPX file {:?}", output_path))?;
    Ok(())
}

/// Export track points as CSV, one row per point in track order
#[cfg(feature = "csv")]
pub fn export_to_csv(track: &Track, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create CSV file {:?}", output_path))?;

    writer.write_record([
        "latitude",
        "longitude",
        "elevation (m)",
        "time",
        "satellites",
        "speed (m/s)",
    ])?;

    for point in &track.points {
        writer.write_record([
            format!("{:.7}", point.latitude),
            format!("{:.7}", point.longitude),
            format!("{:.3}", point.elevation),
            point.time.as_ref().map(format_gpx_timestamp).unwrap_or_default(),
            point.num_sats.map(|n| n.to_string()).unwrap_or_default(),
            point.speed.map(|s| format!("{:.3}", s)).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Summary written by [`export_report_json`]
#[cfg(feature = "json")]
#[derive(Debug, serde::Serialize)]
pub struct ConversionSummary<'a> {
    pub point_count: usize,
    pub protocol_version: Option<String>,
    pub bounds: Option<crate::types::TrackBounds>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub stats: &'a crate::types::MessageStats,
}

#[cfg(feature = "json")]
impl<'a> ConversionSummary<'a> {
    pub fn new(conversion: &'a Conversion) -> Self {
        let range = conversion.track.time_range();
        Self {
            point_count: conversion.point_count(),
            protocol_version: conversion.protocol_version.as_ref().map(|v| v.to_string()),
            bounds: conversion.track.bounds(),
            start_time: range.map(|(start, _)| format_gpx_timestamp(&start)),
            end_time: range.map(|(_, end)| format_gpx_timestamp(&end)),
            stats: &conversion.stats,
        }
    }
}

/// Export point count and message statistics as pretty-printed JSON
#[cfg(feature = "json")]
pub fn export_report_json(conversion: &Conversion, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let json = serde_json::to_string_pretty(&ConversionSummary::new(conversion))?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write stats file {:?}", output_path))?;
    Ok(())
}
