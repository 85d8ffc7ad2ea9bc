//! GPX rendering of generated workouts.
//!
//! Heart-rate extensions are written by hand since the `gpx` crate does not
//! model them; [`write_plain_file`] goes through `gpx` for documents without.

use std::path::Path;

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::workout::{Fix, HrEncoding, Workout};

/// Time layout of embedded heart-rate log lines.
const LOG_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

#[derive(Debug, Error)]
pub enum GpxWriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("GPX write error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("Time format error: {0}")]
    Format(#[from] time::error::Format),
}

/// One embedded-log line: `"<bpm> <yyyy-mm-ddThh:mm:ssZ>"`.
pub fn hr_log_line(bpm: f64, time: OffsetDateTime) -> Result<String, GpxWriteError> {
    Ok(format!("{bpm:.0} {}", time.format(LOG_TIME_FORMAT)?))
}

/// Renders a workout as GPX 1.1 with heart rate in its configured encoding.
pub fn render_gpx(workout: &Workout) -> Result<Vec<u8>, GpxWriteError> {
    let mut gpx = String::new();

    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(r#"<gpx version="1.1" creator="stl-stats-test-data""#);
    gpx.push_str(r#" xmlns="http://www.topografix.com/GPX/1/1""#);
    gpx.push_str(r#" xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1""#);
    gpx.push_str(r#" xmlns:om="http://www.oruxmaps.com/oruxmapsextensions/1/0">"#);
    gpx.push('\n');

    gpx.push_str("  <trk>\n");
    gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(&workout.name)));

    if workout.hr_encoding == HrEncoding::EmbeddedLog {
        let lines = workout
            .fixes()
            .filter_map(|f| f.heart_rate.map(|bpm| hr_log_line(bpm, f.time)))
            .collect::<Result<Vec<_>, _>>()?;
        gpx.push_str("    <extensions>\n");
        gpx.push_str(&format!("      <om:bpm>{}</om:bpm>\n", lines.join("\n")));
        gpx.push_str("    </extensions>\n");
    }

    for segment in &workout.segments {
        gpx.push_str("    <trkseg>\n");
        for fix in segment {
            push_point(&mut gpx, fix, workout.hr_encoding == HrEncoding::PerPoint)?;
        }
        gpx.push_str("    </trkseg>\n");
    }

    gpx.push_str("  </trk>\n");
    gpx.push_str("</gpx>\n");

    Ok(gpx.into_bytes())
}

fn push_point(gpx: &mut String, fix: &Fix, with_hr: bool) -> Result<(), GpxWriteError> {
    gpx.push_str(&format!(
        r#"      <trkpt lat="{:.7}" lon="{:.7}">"#,
        fix.lat, fix.lon
    ));
    gpx.push('\n');
    if let Some(ele) = fix.elevation {
        gpx.push_str(&format!("        <ele>{:.2}</ele>\n", ele));
    }
    gpx.push_str(&format!("        <time>{}</time>\n", fix.time.format(&Rfc3339)?));
    if let (true, Some(bpm)) = (with_hr, fix.heart_rate) {
        gpx.push_str("        <extensions><gpxtpx:TrackPointExtension>");
        gpx.push_str(&format!("<gpxtpx:hr>{bpm:.0}</gpxtpx:hr>"));
        gpx.push_str("</gpxtpx:TrackPointExtension></extensions>\n");
    }
    gpx.push_str("      </trkpt>\n");
    Ok(())
}

/// Writes the workout's route through the `gpx` crate, without heart rate.
pub fn write_plain_file(path: impl AsRef<Path>, workout: &Workout) -> Result<(), GpxWriteError> {
    use geo::Point;
    use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

    let segments = workout
        .segments
        .iter()
        .map(|fixes| TrackSegment {
            points: fixes
                .iter()
                .map(|f| {
                    let mut wp = Waypoint::new(Point::new(f.lon, f.lat));
                    wp.elevation = f.elevation;
                    wp.time = Some(gpx::Time::from(f.time));
                    wp
                })
                .collect(),
        })
        .collect();

    let mut track = Track::new();
    track.name = Some(workout.name.clone());
    track.segments = segments;

    let gpx = Gpx {
        version: GpxVersion::Gpx11,
        tracks: vec![track],
        ..Default::default()
    };

    let file = std::fs::File::create(path)?;
    gpx::write(&gpx, file)?;
    Ok(())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
