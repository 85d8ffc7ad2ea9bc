//! End-to-end tests: generated GPX documents through reading, extraction and
//! summary.

use rand::SeedableRng;
use rand::rngs::StdRng;
use stl_stats::{Averaging, Settings, TrackFile};
use test_data::prelude::*;

fn meters() -> Settings {
    Settings {
        elevation_in_feet: false,
        ..Default::default()
    }
}

fn generate(seed: u64, segments: usize, points: usize, encoding: HrEncoding) -> Workout {
    let mut rng = StdRng::seed_from_u64(seed);
    WorkoutGenerator::new(seed as u32)
        .with_segments(segments, points)
        .with_hr_encoding(encoding)
        .generate(&mut rng)
}

fn load(workout: &Workout, settings: &Settings) -> TrackFile {
    let bytes = render_gpx(workout).expect("render GPX");
    TrackFile::from_bytes(&bytes, settings).expect("load GPX")
}

#[test]
fn per_point_heart_rate_with_segment_break() {
    let workout = generate(11, 2, 30, HrEncoding::PerPoint);
    let settings = meters();
    let file = load(&workout, &settings);
    let series = &file.series;

    assert_eq!(series.n_tracks, 1);
    assert_eq!(series.n_segments, 2);
    assert_eq!(series.n_points, 60);
    assert_eq!(series.n_hr_values, workout.heart_rate_count());

    // one sentinel per signal at the break
    assert_eq!(series.hr.len(), 61);
    assert_eq!(series.elevation.len(), 61);
    assert_eq!(series.speed.len(), 29 + 1 + 29);
    assert!(series.hr.values()[30].is_nan());
    assert_eq!(series.hr.timestamps()[30], series.hr.timestamps()[29]);
    assert_eq!(series.hr.valid_count(), 60);

    let expected: Vec<f64> = workout.fixes().filter_map(|f| f.heart_rate).collect();
    let actual: Vec<f64> = series.hr.values().iter().copied().filter(|v| !v.is_nan()).collect();
    assert_eq!(actual, expected);

    let summary = file.summary(&settings);
    let hr = summary.hr.expect("hr summary");
    assert_eq!(hr.averaging, Averaging::Simple);
    assert!(hr.stats.min <= hr.stats.avg && hr.stats.avg <= hr.stats.max);
    assert_eq!(summary.elevation.map(|e| e.averaging), Some(Averaging::Simple));
    assert!(summary.elevation_gain_loss.is_some());
    assert!(summary.to_string().contains("(simple average)"));
}

#[test]
fn single_segment_is_time_weighted() {
    let workout = generate(12, 1, 50, HrEncoding::PerPoint);
    let settings = meters();
    let file = load(&workout, &settings);
    let summary = file.summary(&settings);

    assert_eq!(summary.hr.map(|s| s.averaging), Some(Averaging::TimeWeighted));
    assert_eq!(summary.speed.map(|s| s.averaging), Some(Averaging::TimeWeighted));
    assert_eq!(summary.elevation.map(|s| s.averaging), Some(Averaging::TimeWeighted));

    let start = workout.segments[0][0].time.unix_timestamp() * 1000;
    let end = workout.segments[0][49].time.unix_timestamp() * 1000;
    let range = summary.time_range.expect("time range");
    assert_eq!((range.start, range.end), (start, end));
    assert_eq!(summary.hr_time_range, summary.time_range);
}

#[test]
fn embedded_log_heart_rate() {
    let workout = generate(13, 2, 25, HrEncoding::EmbeddedLog);
    let settings = meters();
    let file = load(&workout, &settings);
    let series = &file.series;

    assert!(!series.hr_log_errors);
    assert_eq!(series.n_hr_values, 50);
    assert_eq!(series.hr.len(), 51);
    assert!(series.hr.values()[25].is_nan());
    assert!(series.hr.timestamps().windows(2).all(|w| w[0] <= w[1]));

    let expected: Vec<f64> = workout.fixes().filter_map(|f| f.heart_rate).collect();
    let actual: Vec<f64> = series.hr.values().iter().copied().filter(|v| !v.is_nan()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn moving_average_ignores_stops() {
    let mut rng = StdRng::seed_from_u64(14);
    let workout = WorkoutGenerator::new(14)
        .with_terrain(ElevationGenerator::hilly(14))
        .with_segments(1, 200)
        .with_stop_probability(0.3)
        .generate(&mut rng);
    let settings = meters();
    let file = load(&workout, &settings);
    let summary = file.summary(&settings);

    let overall = summary.speed.expect("speed summary");
    let moving = summary.moving_speed.expect("moving speed summary");
    assert!(moving.stats.avg >= overall.stats.avg);
    assert!(moving.stats.min >= settings.not_moving_speed_mph());
    assert!(overall.stats.min == 0.0);
}

#[test]
fn configured_workout_keeps_its_timing() {
    let config = WorkoutConfig {
        name: "Evening Ride".to_string(),
        segments: 3,
        points_per_segment: 10,
        interval_secs: (2, 2),
        segment_gap_secs: 60,
        hr_encoding: HrEncoding::EmbeddedLog,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(17);
    let workout = WorkoutGenerator::new(17)
        .with_config(config)
        .generate(&mut rng);
    let file = load(&workout, &meters());
    let series = &file.series;

    assert_eq!(file.tracks[0].name.as_deref(), Some("Evening Ride"));
    assert_eq!(series.n_segments, 3);
    assert_eq!(series.n_points, 30);
    assert_eq!(series.n_hr_values, 30);
    // Three segments of nine 2 s steps plus two 60 s pauses.
    assert_eq!(series.time_range.unwrap().duration_ms(), 174_000);
    assert_eq!(series.hr.values().iter().filter(|v| v.is_nan()).count(), 2);
}

#[test]
fn elevation_units_follow_settings() {
    let workout = generate(15, 1, 20, HrEncoding::None);
    let in_meters = load(&workout, &meters());
    let in_feet = load(&workout, &Settings::default());

    for (m, ft) in in_meters
        .series
        .elevation
        .values()
        .iter()
        .zip(in_feet.series.elevation.values())
    {
        assert!((m * 3.280839895 - ft).abs() < 1e-6);
    }
    assert_eq!(in_feet.summary(&Settings::default()).elevation_unit, "ft");
}

#[test]
fn plain_gpx_file_without_heart_rate() {
    let workout = generate(16, 2, 15, HrEncoding::None);
    let path = std::env::temp_dir().join("stl_stats_plain_workout.gpx");
    write_plain_file(&path, &workout).expect("write GPX");

    let settings = meters();
    let file = TrackFile::open(&path, &settings).expect("open GPX");
    std::fs::remove_file(&path).ok();

    assert_eq!(file.file_name.as_deref(), Some("stl_stats_plain_workout.gpx"));
    assert_eq!(file.tracks[0].name.as_deref(), Some("Morning Run"));
    assert_eq!(file.series.n_points, 30);
    assert_eq!(file.series.n_segments, 2);
    assert_eq!(file.series.n_hr_values, 0);
    assert_eq!(file.series.hr_time_range, None);

    let text = file.summary(&settings).to_string();
    assert!(text.starts_with("stl_stats_plain_workout.gpx\n"));
    assert!(text.contains("30 Track Points        0 HR Values"));
    assert!(!text.contains("HR Duration"));
}
