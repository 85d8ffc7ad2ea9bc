//! Rolling average applied to a series before it is charted or exported.

use crate::extract::Series;

/// Trailing mean over the last `window` samples.
///
/// A `NaN` sample is passed through and restarts the window, so segment
/// boundaries survive smoothing. A window of 0 or 1 leaves the series as is.
pub fn rolling_average(series: &Series, window: usize) -> Series {
    if window <= 1 {
        return series.clone();
    }

    let values = series.values();
    let mut run_start = 0;
    series
        .iter()
        .enumerate()
        .map(|(i, (t, v))| {
            if v.is_nan() {
                run_start = i + 1;
                return (t, v);
            }
            let start = run_start.max((i + 1).saturating_sub(window));
            let slice = &values[start..=i];
            (t, slice.iter().sum::<f64>() / slice.len() as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_of_one_is_identity() {
        let s: Series = [(0, 1.0), (1, 5.0)].into_iter().collect();
        assert_eq!(rolling_average(&s, 0), s);
        assert_eq!(rolling_average(&s, 1), s);
    }

    #[test]
    fn test_trailing_mean() {
        let s: Series = [(0, 1.0), (1, 2.0), (2, 3.0), (3, 6.0)].into_iter().collect();
        let smoothed = rolling_average(&s, 3);
        assert_eq!(smoothed.timestamps(), s.timestamps());
        assert_eq!(smoothed.values(), &[1.0, 1.5, 2.0, 11.0 / 3.0]);
    }

    #[test]
    fn test_gap_restarts_window() {
        let s: Series = [(0, 10.0), (1, 20.0), (1, f64::NAN), (5, 40.0), (6, 50.0)]
            .into_iter()
            .collect();
        let smoothed = rolling_average(&s, 5);
        let v = smoothed.values();
        assert_eq!(v[1], 15.0);
        assert!(v[2].is_nan());
        assert_eq!(v[3], 40.0);
        assert_eq!(v[4], 45.0);
    }
}
