//! Track sample extraction.
//!
//! Walks tracks, segments and points once and produces the heart-rate, speed
//! and elevation series together with the counts and time spans shown in the
//! file summary.

use std::iter::Peekable;
use std::vec::IntoIter;

use serde::Serialize;
use tracing::{debug, warn};

use crate::distance::distance_between;
use crate::hr_log::HrLogSample;
use crate::model::{HeartRateSource, Point, Track};
use crate::settings::Settings;
use crate::units::{MS_PER_SEC, meters_to_feet, ms_to_mph};

/// Timestamp used for a boundary sentinel when nothing has been observed yet.
pub const NO_TIME: i64 = -1;

/// A time series of `(timestamp_ms, value)` samples.
///
/// Timestamps and values are kept in two parallel vectors of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    timestamps: Vec<i64>,
    values: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time_ms: i64, value: f64) {
        self.timestamps.push(time_ms);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of samples that are not boundary sentinels or failed readings.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}

impl FromIterator<(i64, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        let mut series = Series::new();
        for (t, v) in iter {
            series.push(t, v);
        }
        series
    }
}

/// Inclusive span of observed timestamps, in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn duration_ms(&self) -> i64 {
        self.end - self.start
    }

    fn extend(range: &mut Option<TimeRange>, time_ms: i64) {
        match range {
            Some(r) => {
                r.start = r.start.min(time_ms);
                r.end = r.end.max(time_ms);
            }
            None => {
                *range = Some(TimeRange {
                    start: time_ms,
                    end: time_ms,
                })
            }
        }
    }
}

/// Everything extracted from one loaded file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackSeries {
    /// Heart rate in bpm.
    pub hr: Series,
    /// Speed in mph, stamped at the midpoint of each pair of fixes.
    pub speed: Series,
    /// Elevation in meters or feet, per [`Settings::elevation_in_feet`].
    pub elevation: Series,
    pub n_tracks: usize,
    pub n_segments: usize,
    pub n_points: usize,
    pub n_hr_values: usize,
    /// Span of all point timestamps.
    pub time_range: Option<TimeRange>,
    /// Span of all heart-rate samples.
    pub hr_time_range: Option<TimeRange>,
    /// At least one embedded heart-rate log line could not be parsed.
    pub hr_log_errors: bool,
}

impl TrackSeries {
    pub fn extract(tracks: &[Track], settings: &Settings) -> Self {
        let mut extractor = Extractor::new(settings);
        for track in tracks {
            extractor.track(track);
        }
        let series = extractor.out;

        debug!(
            tracks = series.n_tracks,
            segments = series.n_segments,
            points = series.n_points,
            hr_values = series.n_hr_values,
            "extracted track series"
        );
        if series.hr_log_errors {
            warn!("some heart-rate log lines could not be parsed");
        }
        series
    }
}

struct Extractor<'a> {
    settings: &'a Settings,
    out: TrackSeries,
    last_time_value: i64,
}

impl<'a> Extractor<'a> {
    fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            out: TrackSeries::default(),
            last_time_value: NO_TIME,
        }
    }

    fn track(&mut self, track: &Track) {
        self.out.n_tracks += 1;

        let resolved = track.heart_rate_source();
        self.out.hr_log_errors |= resolved.log_errors;
        let (use_point_hr, mut log): (bool, Peekable<IntoIter<HrLogSample>>) =
            match resolved.source {
                HeartRateSource::PerPointField => (true, Vec::new().into_iter().peekable()),
                HeartRateSource::EmbeddedLog(samples) => {
                    debug!(samples = samples.len(), "using embedded heart-rate log");
                    (false, samples.into_iter().peekable())
                }
            };

        for (index, segment) in track.segments.iter().enumerate() {
            self.out.n_segments += 1;
            if index > 0 {
                self.boundary();
            }

            let mut previous: Option<&Point> = None;
            for point in &segment.points {
                let time = point.time_ms();

                while let Some(sample) = log.next_if(|s| s.time_ms <= time) {
                    self.hr_sample(sample.time_ms, sample.bpm);
                }

                self.point(point, time, previous);

                if use_point_hr {
                    if let Some(text) = point.heart_rate.as_deref() {
                        let bpm = text.trim().parse().unwrap_or(f64::NAN);
                        self.hr_sample(time, bpm);
                    }
                }

                previous = Some(point);
            }
        }

        for sample in log {
            self.hr_sample(sample.time_ms, sample.bpm);
        }
    }

    /// Breaks all three series between segments without adding a real value.
    fn boundary(&mut self) {
        let t = self.last_time_value;
        self.out.hr.push(t, f64::NAN);
        self.out.speed.push(t, f64::NAN);
        self.out.elevation.push(t, f64::NAN);
    }

    fn point(&mut self, point: &Point, time: i64, previous: Option<&Point>) {
        self.out.n_points += 1;
        TimeRange::extend(&mut self.out.time_range, time);
        self.last_time_value = time;

        let elevation = if self.settings.elevation_in_feet {
            meters_to_feet(point.elevation)
        } else {
            point.elevation
        };
        self.out.elevation.push(time, elevation);

        if let Some(prev) = previous {
            let prev_time = prev.time_ms();
            let dt = time - prev_time;
            let speed_ms = if dt > 0 {
                let distance = distance_between(prev.position(), point.position());
                distance / (dt as f64 / MS_PER_SEC)
            } else {
                0.0
            };
            self.out.speed.push(time - round_half_up(0.5 * dt as f64), ms_to_mph(speed_ms));
        }
    }

    fn hr_sample(&mut self, time: i64, bpm: f64) {
        self.out.hr.push(time, bpm);
        self.out.n_hr_values += 1;
        TimeRange::extend(&mut self.out.hr_time_range, time);
        self.last_time_value = time;
    }
}

/// Rounds to the nearest integer with halves going towards positive infinity.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}
