//! Aggregate statistics over irregularly sampled series.

use serde::Serialize;

use crate::errors::StatsError;

/// `omit_below` value that keeps every non-NaN sample.
pub const KEEP_ALL: f64 = f64::NEG_INFINITY;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl Stats {
    pub const ZERO: Stats = Stats {
        min: 0.0,
        max: 0.0,
        avg: 0.0,
    };

    fn constant(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            avg: value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GainLoss {
    pub gain: f64,
    pub loss: f64,
}

/// Unweighted min, max and mean.
///
/// `NaN` values and values strictly below `omit_below` are skipped. An empty
/// input gives [`Stats::ZERO`]; an input where nothing survives is `NoData`.
pub fn simple_stats(values: &[f64], omit_below: f64) -> Result<Stats, StatsError> {
    if values.is_empty() {
        return Ok(Stats::ZERO);
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if v.is_nan() || v < omit_below {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
        sum += v;
        count += 1;
    }

    if count == 0 {
        return Err(StatsError::NoData);
    }
    Ok(Stats {
        min,
        max,
        avg: sum / count as f64,
    })
}

/// Time-weighted min, max and mean.
///
/// Each sample is weighted by half the interval preceding it. The first
/// sample has no preceding interval and takes half of the first one, so
/// interior samples carry only half of the time they span. Any `NaN` in
/// `values` abandons the computation.
pub fn weighted_stats(
    values: &[f64],
    timestamps: &[i64],
    omit_below: f64,
) -> Result<Stats, StatsError> {
    if values.len() != timestamps.len() {
        return Err(StatsError::LengthMismatch {
            values: values.len(),
            timestamps: timestamps.len(),
        });
    }
    if values.iter().any(|v| v.is_nan()) {
        return Err(StatsError::ContainsNaN);
    }
    match values {
        [] => return Ok(Stats::ZERO),
        [v] => return Ok(Stats::constant(*v)),
        _ => {}
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (i, &v) in values.iter().enumerate() {
        if v < omit_below {
            continue;
        }
        let weight = if i == 0 {
            0.5 * (timestamps[1] - timestamps[0]) as f64
        } else {
            0.5 * (timestamps[i] - timestamps[i - 1]) as f64
        };
        min = min.min(v);
        max = max.max(v);
        weighted_sum += weight * v;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return Err(StatsError::NoData);
    }
    Ok(Stats {
        min,
        max,
        avg: weighted_sum / total_weight,
    })
}

/// Total climb and descent along a series. `NaN` differences are skipped.
pub fn elevation_gain_loss(values: &[f64]) -> Result<GainLoss, StatsError> {
    let mut gain = 0.0;
    let mut loss = 0.0;
    let mut valid = false;
    for pair in values.windows(2) {
        let delta = pair[1] - pair[0];
        if delta.is_nan() {
            continue;
        }
        valid = true;
        if delta > 0.0 {
            gain += delta;
        } else {
            loss -= delta;
        }
    }

    if !valid {
        return Err(StatsError::NoData);
    }
    Ok(GainLoss { gain, loss })
}

/// Time-weighted speed stats over moving time only.
///
/// `not_moving` is in the same unit as `speeds`.
pub fn moving_stats(
    speeds: &[f64],
    timestamps: &[i64],
    not_moving: f64,
) -> Result<Stats, StatsError> {
    weighted_stats(speeds, timestamps, not_moving)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_simple_empty_is_zero() {
        assert_eq!(simple_stats(&[], KEEP_ALL), Ok(Stats::ZERO));
    }

    #[test]
    fn test_simple_omit_below() {
        let stats = simple_stats(&[1.0, 5.0, 10.0], 5.0).unwrap();
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.avg, 7.5);
    }

    #[test]
    fn test_simple_skips_nan() {
        let stats = simple_stats(&[2.0, f64::NAN, 4.0], KEEP_ALL).unwrap();
        assert_eq!(stats, Stats { min: 2.0, max: 4.0, avg: 3.0 });
    }

    #[test]
    fn test_simple_nothing_survives() {
        assert_eq!(simple_stats(&[f64::NAN, f64::NAN], KEEP_ALL), Err(StatsError::NoData));
        assert_eq!(simple_stats(&[1.0, 2.0], 3.0), Err(StatsError::NoData));
    }

    #[test]
    fn test_weighted_degenerate_lengths() {
        assert_eq!(weighted_stats(&[], &[], KEEP_ALL), Ok(Stats::ZERO));
        assert_eq!(
            weighted_stats(&[42.0], &[1000], KEEP_ALL),
            Ok(Stats { min: 42.0, max: 42.0, avg: 42.0 })
        );
    }

    #[test]
    fn test_weighted_rejects_nan() {
        let t = [0, 1000, 2000];
        assert_eq!(
            weighted_stats(&[1.0, f64::NAN, 3.0], &t, KEEP_ALL),
            Err(StatsError::ContainsNaN)
        );
        // a NaN below the threshold still abandons the computation
        assert_eq!(
            weighted_stats(&[10.0, f64::NAN, 30.0], &t, 100.0),
            Err(StatsError::ContainsNaN)
        );
        assert_eq!(weighted_stats(&[f64::NAN], &[0], KEEP_ALL), Err(StatsError::ContainsNaN));
    }

    #[test]
    fn test_weighted_length_mismatch() {
        assert_eq!(
            weighted_stats(&[1.0, 2.0], &[0], KEEP_ALL),
            Err(StatsError::LengthMismatch { values: 2, timestamps: 1 })
        );
    }

    #[test]
    fn test_weighted_uniform_spacing_matches_mean() {
        let stats = weighted_stats(&[1.0, 2.0, 3.0, 6.0], &[0, 1000, 2000, 3000], KEEP_ALL).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 6.0);
        assert!(close(stats.avg, 3.0));
    }

    #[test]
    fn test_weighted_boundary_weights() {
        // Weights are 500, 500, 1000: each sample takes half of the interval
        // before it and the first sample borrows half of the first interval.
        // Symmetric neighbour weighting (500, 1500, 1000) would give 21.67.
        let stats = weighted_stats(&[10.0, 20.0, 30.0], &[0, 1000, 3000], KEEP_ALL).unwrap();
        assert!(close(stats.avg, 22.5));
    }

    #[test]
    fn test_weighted_omit_below() {
        let stats = weighted_stats(&[0.1, 4.0, 0.2, 6.0], &[0, 1000, 2000, 3000], 1.0).unwrap();
        assert_eq!(stats.min, 4.0);
        assert_eq!(stats.max, 6.0);
        assert!(close(stats.avg, 5.0));
    }

    #[test]
    fn test_weighted_zero_weight_is_no_data() {
        assert_eq!(
            weighted_stats(&[1.0, 2.0], &[5000, 5000], KEEP_ALL),
            Err(StatsError::NoData)
        );
        assert_eq!(
            weighted_stats(&[1.0, 2.0], &[0, 1000], 10.0),
            Err(StatsError::NoData)
        );
    }

    #[test]
    fn test_gain_loss() {
        let gl = elevation_gain_loss(&[100.0, 110.0, 105.0, 105.0, 120.0]).unwrap();
        assert_eq!(gl, GainLoss { gain: 25.0, loss: 5.0 });
    }

    #[test]
    fn test_gain_loss_skips_gaps() {
        let gl = elevation_gain_loss(&[100.0, 110.0, f64::NAN, 50.0, 40.0]).unwrap();
        assert_eq!(gl, GainLoss { gain: 10.0, loss: 10.0 });
    }

    #[test]
    fn test_gain_loss_no_pairs() {
        assert_eq!(elevation_gain_loss(&[]), Err(StatsError::NoData));
        assert_eq!(elevation_gain_loss(&[100.0]), Err(StatsError::NoData));
        assert_eq!(elevation_gain_loss(&[100.0, f64::NAN, 90.0]), Err(StatsError::NoData));
    }

    #[test]
    fn test_moving_excludes_stops() {
        let t = [0, 1000, 2000, 3000];
        let all = weighted_stats(&[10.0, 0.0, 0.0, 10.0], &t, KEEP_ALL).unwrap();
        let moving = moving_stats(&[10.0, 0.0, 0.0, 10.0], &t, 1.0).unwrap();
        assert!(close(all.avg, 5.0));
        assert!(close(moving.avg, 10.0));
        assert_eq!(moving.min, 10.0);
    }
}
