//! Per-file summary built from the extracted series.
//!
//! Averages are time-weighted where possible. When the weighted computation
//! is unavailable (gaps, mismatched lengths, no usable weight) the summary
//! falls back to an unweighted average and says so.

use std::fmt;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::errors::StatsError;
use crate::extract::{Series, TimeRange, TrackSeries};
use crate::settings::Settings;
use crate::stats::{
    GainLoss, KEEP_ALL, Stats, elevation_gain_loss, moving_stats, simple_stats, weighted_stats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Averaging {
    TimeWeighted,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalSummary {
    #[serde(flatten)]
    pub stats: Stats,
    pub averaging: Averaging,
}

impl SignalSummary {
    /// Weighted stats first, unweighted on any failure. `None` when neither
    /// can produce a value.
    pub fn of(name: &str, series: &Series, omit_below: f64) -> Option<Self> {
        let weighted = weighted_stats(series.values(), series.timestamps(), omit_below);
        Self::with_fallback(name, weighted, series, omit_below)
    }

    /// Speed over moving time only; `not_moving` is in the series' unit.
    pub fn moving(series: &Series, not_moving: f64) -> Option<Self> {
        let weighted = moving_stats(series.values(), series.timestamps(), not_moving);
        Self::with_fallback("moving_speed", weighted, series, not_moving)
    }

    fn with_fallback(
        name: &str,
        weighted: Result<Stats, StatsError>,
        series: &Series,
        omit_below: f64,
    ) -> Option<Self> {
        match weighted {
            Ok(stats) => Some(Self {
                stats,
                averaging: Averaging::TimeWeighted,
            }),
            Err(err) => {
                debug!(signal = name, error = %err, "falling back to simple average");
                match simple_stats(series.values(), omit_below) {
                    Ok(stats) => Some(Self {
                        stats,
                        averaging: Averaging::Simple,
                    }),
                    Err(err) => {
                        debug!(signal = name, error = %err, "no statistics available");
                        None
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub file_name: Option<String>,
    pub n_tracks: usize,
    pub n_segments: usize,
    pub n_points: usize,
    pub n_hr_values: usize,
    pub time_range: Option<TimeRange>,
    pub hr_time_range: Option<TimeRange>,
    pub hr_log_errors: bool,
    pub hr: Option<SignalSummary>,
    pub speed: Option<SignalSummary>,
    /// Speed over moving time only.
    pub moving_speed: Option<SignalSummary>,
    pub elevation: Option<SignalSummary>,
    pub elevation_gain_loss: Option<GainLoss>,
    pub elevation_unit: &'static str,
}

impl TrackSummary {
    pub fn new(file_name: Option<String>, series: &TrackSeries, settings: &Settings) -> Self {
        let gain_loss = match elevation_gain_loss(series.elevation.values()) {
            Ok(gl) => Some(gl),
            Err(err) => {
                debug!(error = %err, "no elevation gain/loss");
                None
            }
        };

        Self {
            file_name,
            n_tracks: series.n_tracks,
            n_segments: series.n_segments,
            n_points: series.n_points,
            n_hr_values: series.n_hr_values,
            time_range: series.time_range,
            hr_time_range: series.hr_time_range,
            hr_log_errors: series.hr_log_errors,
            hr: SignalSummary::of("hr", &series.hr, KEEP_ALL),
            speed: SignalSummary::of("speed", &series.speed, KEEP_ALL),
            moving_speed: SignalSummary::moving(&series.speed, settings.not_moving_speed_mph()),
            elevation: SignalSummary::of("elevation", &series.elevation, KEEP_ALL),
            elevation_gain_loss: gain_loss,
            elevation_unit: settings.elevation_unit(),
        }
    }
}

fn format_time(ms: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| ms.to_string())
}

/// Formats a span as "H hr M min S sec".
pub fn format_duration(ms: i64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours} hr {minutes} min {seconds} sec")
}

fn write_signal(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    unit: &str,
    signal: Option<&SignalSummary>,
) -> fmt::Result {
    let Some(s) = signal else {
        return Ok(());
    };
    write!(
        f,
        "{label}: min {:.1} max {:.1} avg {:.1} {unit}",
        s.stats.min, s.stats.max, s.stats.avg
    )?;
    if s.averaging == Averaging::Simple {
        write!(f, " (simple average)")?;
    }
    writeln!(f)
}

impl fmt::Display for TrackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.file_name {
            writeln!(f, "{name}")?;
            writeln!(f)?;
        }

        if let Some(range) = self.time_range {
            writeln!(f, "Tracks: {} to {}", format_time(range.start), format_time(range.end))?;
            writeln!(f, "Duration: {}", format_duration(range.duration_ms()))?;
        }
        if self.n_hr_values != 0 {
            if let Some(range) = self.hr_time_range {
                writeln!(f, "HR: {} to {}", format_time(range.start), format_time(range.end))?;
                writeln!(f, "HR Duration: {}", format_duration(range.duration_ms()))?;
            }
        }
        writeln!(f, "{} Tracks        {} Segments", self.n_tracks, self.n_segments)?;
        writeln!(f, "{} Track Points        {} HR Values", self.n_points, self.n_hr_values)?;
        if self.hr_log_errors {
            writeln!(f, "Some heart-rate log lines could not be read")?;
        }

        write_signal(f, "HR", "bpm", self.hr.as_ref())?;
        write_signal(f, "Speed", "mph", self.speed.as_ref())?;
        write_signal(f, "Moving speed", "mph", self.moving_speed.as_ref())?;
        write_signal(f, "Elevation", self.elevation_unit, self.elevation.as_ref())?;
        if let Some(gl) = self.elevation_gain_loss {
            writeln!(
                f,
                "Elevation gain {:.1} {unit}  loss {:.1} {unit}",
                gl.gain,
                gl.loss,
                unit = self.elevation_unit
            )?;
        }
        Ok(())
    }
}
