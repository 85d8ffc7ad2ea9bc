use serde::Serialize;
use time::OffsetDateTime;

use crate::hr_log::{HrLogSample, parse_hr_log};

/// Converts an absolute time to Unix milliseconds.
pub fn unix_millis(time: OffsetDateTime) -> i64 {
    (time.unix_timestamp_nanos() / 1_000_000) as i64
}

/// A single GPS fix.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    /// Meters. `NaN` when the file did not carry an elevation.
    pub elevation: f64,
    pub timestamp: OffsetDateTime,
    /// Raw text of the per-point HR extension field, when present.
    pub heart_rate: Option<String>,
}

impl Point {
    pub fn new(lat: f64, lon: f64, elevation: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            lat,
            lon,
            elevation,
            timestamp,
            heart_rate: None,
        }
    }

    pub fn with_heart_rate(mut self, heart_rate: impl Into<String>) -> Self {
        self.heart_rate = Some(heart_rate.into());
        self
    }

    pub fn time_ms(&self) -> i64 {
        unix_millis(self.timestamp)
    }

    /// Position as a `geo` point (x = longitude, y = latitude).
    pub fn position(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

/// A contiguous run of fixes without a recording break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<Point>,
}

impl Segment {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// One recorded activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub segments: Vec<Segment>,
    /// Embedded heart-rate log attached to the whole track.
    pub hr_log: Option<String>,
}

impl Track {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    pub fn with_hr_log(mut self, log: impl Into<String>) -> Self {
        self.hr_log = Some(log.into());
        self
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }

    /// Decides where this track's heart rate comes from.
    ///
    /// The embedded log wins when it is non-empty and at least one line
    /// parses; otherwise the per-point fields are used.
    pub fn heart_rate_source(&self) -> ResolvedHeartRate {
        let Some(log) = self.hr_log.as_deref().filter(|l| !l.trim().is_empty()) else {
            return ResolvedHeartRate {
                source: HeartRateSource::PerPointField,
                log_errors: false,
            };
        };

        let parsed = parse_hr_log(log);
        let source = if parsed.samples.is_empty() {
            HeartRateSource::PerPointField
        } else {
            HeartRateSource::EmbeddedLog(parsed.samples)
        };

        ResolvedHeartRate {
            source,
            log_errors: parsed.had_errors,
        }
    }
}

/// The two known heart-rate encodings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HeartRateSource {
    /// HR is read from each point's extension field.
    PerPointField,
    /// HR comes from the track-level log, in log order.
    EmbeddedLog(Vec<HrLogSample>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHeartRate {
    pub source: HeartRateSource,
    /// At least one embedded log line failed to parse.
    pub log_errors: bool,
}
