//! GPX reading.
//!
//! The `gpx` crate does not expose `<extensions>`, so documents are read with a
//! streaming XML reader. Elements are matched by local name; namespace prefixes
//! (`gpxtpx:`, `ns3:`, ...) vary between recorders and are ignored.

use std::io::BufRead;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use crate::errors::GpxError;
use crate::model::{Point, Segment, Track};

/// Local name of the track-level extension element holding the embedded
/// heart-rate log.
pub const HR_LOG_ELEMENT: &str = "bpm";

/// Loads every track of a GPX file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<Track>, GpxError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let tracks = read_gpx(std::io::BufReader::new(file))?;
    info!(path = %path.display(), tracks = tracks.len(), "loaded GPX file");
    Ok(tracks)
}

/// Loads every track from GPX data in memory.
pub fn load_bytes(data: &[u8]) -> Result<Vec<Track>, GpxError> {
    read_gpx(data)
}

/// A track point whose children have not all been read yet.
#[derive(Debug)]
struct PendingPoint {
    lat: f64,
    lon: f64,
    elevation: f64,
    time: Option<OffsetDateTime>,
    heart_rate: Option<String>,
}

impl PendingPoint {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, GpxError> {
        Ok(Self {
            lat: coordinate(e, "lat")?,
            lon: coordinate(e, "lon")?,
            elevation: f64::NAN,
            time: None,
            heart_rate: None,
        })
    }

    fn finish(self) -> Result<Point, GpxError> {
        let timestamp = self.time.ok_or(GpxError::MissingTime)?;
        Ok(Point {
            lat: self.lat,
            lon: self.lon,
            elevation: self.elevation,
            timestamp,
            heart_rate: self.heart_rate,
        })
    }
}

fn coordinate(e: &BytesStart<'_>, attribute: &'static str) -> Result<f64, GpxError> {
    let attr = e
        .try_get_attribute(attribute)?
        .ok_or(GpxError::MissingAttribute {
            element: "trkpt",
            attribute,
        })?;
    let value = attr.unescape_value()?;
    value.trim().parse().map_err(|_| GpxError::InvalidNumber {
        element: "trkpt",
        value: value.to_string(),
    })
}

fn parse_time(text: &str) -> Result<OffsetDateTime, GpxError> {
    OffsetDateTime::parse(text, &Rfc3339).map_err(|_| GpxError::InvalidTime(text.to_string()))
}

/// True when the innermost open elements are exactly `tail`.
fn ends_with(path: &[String], tail: &[&str]) -> bool {
    path.len() >= tail.len()
        && path[path.len() - tail.len()..]
            .iter()
            .zip(tail)
            .all(|(a, b)| a == b)
}

#[derive(Debug, Default)]
struct DocumentBuilder {
    path: Vec<String>,
    tracks: Vec<Track>,
    track: Option<Track>,
    segment: Option<Segment>,
    point: Option<PendingPoint>,
}

impl DocumentBuilder {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), GpxError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        match name.as_str() {
            "trk" => self.track = Some(Track::default()),
            "trkseg" => self.segment = Some(Segment::default()),
            "trkpt" => self.point = Some(PendingPoint::from_start(e)?),
            _ => {}
        }
        self.path.push(name);

        // An empty <hr> still counts as a reading.
        if let Some(point) = self.point.as_mut() {
            if ends_with(&self.path, &["TrackPointExtension", "hr"]) {
                point.heart_rate = Some(String::new());
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), GpxError> {
        let Some(name) = self.path.pop() else {
            return Ok(());
        };
        match name.as_str() {
            "trkpt" => {
                if let Some(pending) = self.point.take() {
                    let point = pending.finish()?;
                    if let Some(segment) = self.segment.as_mut() {
                        segment.points.push(point);
                    }
                }
            }
            "trkseg" => {
                if let (Some(segment), Some(track)) = (self.segment.take(), self.track.as_mut()) {
                    track.segments.push(segment);
                }
            }
            "trk" => {
                if let Some(track) = self.track.take() {
                    self.tracks.push(track);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), GpxError> {
        let path = self.path.as_slice();

        if let Some(point) = self.point.as_mut() {
            if ends_with(path, &["trkpt", "ele"]) {
                let value = text.trim();
                point.elevation = value.parse().map_err(|_| GpxError::InvalidNumber {
                    element: "ele",
                    value: value.to_string(),
                })?;
            } else if ends_with(path, &["trkpt", "time"]) {
                point.time = Some(parse_time(text.trim())?);
            } else if ends_with(path, &["extensions", "TrackPointExtension", "hr"]) {
                point.heart_rate = Some(text.trim().to_string());
            }
            return Ok(());
        }

        if let Some(track) = self.track.as_mut() {
            if ends_with(path, &["trk", "name"]) {
                track.name = Some(text.trim().to_string());
            } else if ends_with(path, &["trk", "extensions", HR_LOG_ELEMENT]) {
                track.hr_log.get_or_insert_with(String::new).push_str(text);
            }
        }
        Ok(())
    }
}

/// Reads a GPX document into tracks, segments and points.
///
/// Points need `lat`, `lon` and `<time>`; a missing `<ele>` is read as `NaN`.
pub fn read_gpx<R: BufRead>(source: R) -> Result<Vec<Track>, GpxError> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut builder = DocumentBuilder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => builder.open(&e)?,
            Event::Empty(e) => {
                builder.open(&e)?;
                builder.close()?;
            }
            Event::End(_) => builder.close()?,
            Event::Text(e) => {
                let text = e.unescape()?;
                builder.text(&text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                builder.text(&text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if builder.tracks.is_empty() {
        return Err(GpxError::NoTracks);
    }

    debug!(
        tracks = builder.tracks.len(),
        points = builder.tracks.iter().map(Track::point_count).sum::<usize>(),
        "parsed GPX document"
    );
    Ok(builder.tracks)
}
