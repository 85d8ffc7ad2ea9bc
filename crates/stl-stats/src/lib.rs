//! Statistics engine for GPS and heart-rate exercise tracks.
//!
//! [`gpx_reader`] turns a GPX file into [`model`] tracks, [`extract`] walks
//! them into heart-rate, speed and elevation series, and [`summary`] reduces
//! those series to the numbers shown for a file.

pub mod distance;
pub mod errors;
pub mod extract;
pub mod gpx_reader;
pub mod hr_log;
pub mod model;
pub mod settings;
pub mod smoothing;
pub mod stats;
pub mod summary;
pub mod units;
pub mod zones;

use std::path::Path;

pub use errors::{GpxError, SettingsError, StatsError};
pub use extract::{Series, TimeRange, TrackSeries};
pub use model::{HeartRateSource, Point, Segment, Track};
pub use settings::Settings;
pub use stats::{GainLoss, Stats};
pub use summary::{Averaging, SignalSummary, TrackSummary};

/// A loaded file: its tracks and the series extracted from them.
#[derive(Debug, Clone)]
pub struct TrackFile {
    pub file_name: Option<String>,
    pub tracks: Vec<Track>,
    pub series: TrackSeries,
}

impl TrackFile {
    pub fn open(path: impl AsRef<Path>, settings: &Settings) -> Result<Self, GpxError> {
        let path = path.as_ref();
        let tracks = gpx_reader::load_file(path)?;
        let series = TrackSeries::extract(&tracks, settings);
        Ok(Self {
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            tracks,
            series,
        })
    }

    pub fn from_bytes(data: &[u8], settings: &Settings) -> Result<Self, GpxError> {
        let tracks = gpx_reader::load_bytes(data)?;
        let series = TrackSeries::extract(&tracks, settings);
        Ok(Self {
            file_name: None,
            tracks,
            series,
        })
    }

    pub fn summary(&self, settings: &Settings) -> TrackSummary {
        TrackSummary::new(self.file_name.clone(), &self.series, settings)
    }
}
