//! Heart-rate zone bands drawn over the HR chart.

use serde::Serialize;

use crate::extract::Series;

/// Label prefix of a zone band, followed by its bpm value.
pub const ZONE_LABEL_PREFIX: &str = "HR=";

/// A constant bpm line spanning the heart-rate series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneBand {
    pub label: String,
    pub bpm: f64,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// One band per zone boundary, spanning the first to the last HR sample.
///
/// Empty unless the series has more than two samples and a non-zero span.
pub fn zone_bands(hr: &Series, zones: &[f64]) -> Vec<ZoneBand> {
    let timestamps = hr.timestamps();
    let (Some(&start_ms), Some(&end_ms)) = (timestamps.first(), timestamps.last()) else {
        return Vec::new();
    };
    if timestamps.len() <= 2 || start_ms == end_ms {
        return Vec::new();
    }

    zones
        .iter()
        .map(|&bpm| ZoneBand {
            label: format!("{ZONE_LABEL_PREFIX}{bpm:.0}"),
            bpm,
            start_ms,
            end_ms,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_HR_ZONES;

    fn hr(timestamps: &[i64]) -> Series {
        timestamps.iter().map(|&t| (t, 120.0)).collect()
    }

    #[test]
    fn test_bands_span_series() {
        let bands = zone_bands(&hr(&[1000, 2000, 5000]), &DEFAULT_HR_ZONES);
        assert_eq!(bands.len(), 6);
        assert_eq!(bands[0].label, "HR=78");
        assert_eq!(bands[5].label, "HR=157");
        assert!(bands.iter().all(|b| b.start_ms == 1000 && b.end_ms == 5000));
    }

    #[test]
    fn test_short_or_flat_series_has_no_bands() {
        assert!(zone_bands(&Series::new(), &DEFAULT_HR_ZONES).is_empty());
        assert!(zone_bands(&hr(&[0, 1000]), &DEFAULT_HR_ZONES).is_empty());
        assert!(zone_bands(&hr(&[1000, 1000, 1000]), &DEFAULT_HR_ZONES).is_empty());
    }
}
