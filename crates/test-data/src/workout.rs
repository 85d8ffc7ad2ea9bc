//! Synthetic workouts: a wandering route with elevation, timing and heart rate.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::terrain::ElevationGenerator;

/// Meters per degree of latitude.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// How heart rate is stored in the rendered GPX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrEncoding {
    /// No heart rate at all.
    None,
    /// A TrackPointExtension `<hr>` on every point.
    PerPoint,
    /// One track-level log with a `"<bpm> <time>"` line per sample.
    EmbeddedLog,
}

/// One fix of a generated workout.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    pub time: OffsetDateTime,
    pub heart_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Workout {
    pub name: String,
    pub segments: Vec<Vec<Fix>>,
    pub hr_encoding: HrEncoding,
}

impl Workout {
    pub fn fixes(&self) -> impl Iterator<Item = &Fix> {
        self.segments.iter().flatten()
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn heart_rate_count(&self) -> usize {
        self.fixes().filter(|f| f.heart_rate.is_some()).count()
    }
}

#[derive(Debug, Clone)]
pub struct WorkoutConfig {
    pub name: String,
    pub start: (f64, f64),
    pub start_time: OffsetDateTime,
    pub segments: usize,
    pub points_per_segment: usize,
    /// Seconds between fixes, inclusive range.
    pub interval_secs: (i64, i64),
    /// Pause between segments in seconds.
    pub segment_gap_secs: i64,
    /// Mean moving speed in m/s.
    pub speed_mps: f64,
    /// Chance that a fix is recorded while standing still.
    pub stop_probability: f64,
    pub resting_hr: f64,
    pub max_hr: f64,
    pub hr_encoding: HrEncoding,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            name: "Morning Run".to_string(),
            start: (40.0150, -105.2705),
            start_time: datetime!(2014-06-30 15:00:00 UTC),
            segments: 1,
            points_per_segment: 120,
            interval_secs: (1, 5),
            segment_gap_secs: 300,
            speed_mps: 3.0,
            stop_probability: 0.05,
            resting_hr: 70.0,
            max_hr: 185.0,
            hr_encoding: HrEncoding::PerPoint,
        }
    }
}

pub struct WorkoutGenerator {
    config: WorkoutConfig,
    terrain: ElevationGenerator,
}

impl WorkoutGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            config: WorkoutConfig::default(),
            terrain: ElevationGenerator::new(seed),
        }
    }

    pub fn with_config(mut self, config: WorkoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_terrain(mut self, terrain: ElevationGenerator) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn with_segments(mut self, segments: usize, points_per_segment: usize) -> Self {
        self.config.segments = segments;
        self.config.points_per_segment = points_per_segment;
        self
    }

    pub fn with_hr_encoding(mut self, encoding: HrEncoding) -> Self {
        self.config.hr_encoding = encoding;
        self
    }

    pub fn with_stop_probability(mut self, probability: f64) -> Self {
        self.config.stop_probability = probability;
        self
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn generate(&self, rng: &mut impl Rng) -> Workout {
        let cfg = &self.config;
        let turn: Normal<f64> = Normal::new(0.0, 0.15).expect("valid turn spread");
        let pace: Normal<f64> = Normal::new(1.0, 0.1).expect("valid pace spread");
        let hr_noise: Normal<f64> = Normal::new(0.0, 2.0).expect("valid heart-rate noise");

        let (mut lat, mut lon) = cfg.start;
        let mut time = cfg.start_time;
        let mut heading: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let mut hr = cfg.resting_hr;
        let mut segments = Vec::with_capacity(cfg.segments);

        for index in 0..cfg.segments {
            if index > 0 {
                time += Duration::seconds(cfg.segment_gap_secs);
            }
            let mut fixes = Vec::with_capacity(cfg.points_per_segment);
            for i in 0..cfg.points_per_segment {
                if i > 0 {
                    let dt = rng.gen_range(cfg.interval_secs.0..=cfg.interval_secs.1);
                    time += Duration::seconds(dt);

                    let moving = !rng.gen_bool(cfg.stop_probability);
                    let target_hr = if moving { cfg.max_hr * 0.8 } else { cfg.resting_hr };
                    hr += 0.1 * (target_hr - hr) + hr_noise.sample(rng);
                    hr = hr.clamp(cfg.resting_hr * 0.8, cfg.max_hr);

                    if moving {
                        heading += turn.sample(rng);
                        let distance = cfg.speed_mps * pace.sample(rng).max(0.2) * dt as f64;
                        lat += distance * heading.cos() / METERS_PER_DEGREE;
                        lon += distance * heading.sin()
                            / (METERS_PER_DEGREE * lat.to_radians().cos());
                    }
                }

                fixes.push(Fix {
                    lat,
                    lon,
                    elevation: Some(self.terrain.elevation_at(lat, lon)),
                    time,
                    heart_rate: match cfg.hr_encoding {
                        HrEncoding::None => None,
                        _ => Some(hr.round()),
                    },
                });
            }
            segments.push(fixes);
        }

        let workout = Workout {
            name: cfg.name.clone(),
            segments,
            hr_encoding: cfg.hr_encoding,
        };
        debug!(
            name = %workout.name,
            points = workout.point_count(),
            segments = workout.segments.len(),
            "generated workout"
        );
        workout
    }
}
