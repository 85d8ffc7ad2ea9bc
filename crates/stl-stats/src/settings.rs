//! Settings used by the statistics core.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::SettingsError;
use crate::units::MS_TO_MPH;

/// Environment variable naming a settings file to load by default.
pub const SETTINGS_ENV: &str = "STL_SETTINGS";

/// Speed in m/s below which there is considered to be no movement for the
/// purposes of the moving average. 1 mph is 0.44704 m/s.
pub const DEFAULT_NOT_MOVING_SPEED_MS: f64 = 0.5;

/// Default heart-rate zone boundaries in bpm.
pub const DEFAULT_HR_ZONES: [f64; 6] = [78.0, 94.0, 109.0, 125.0, 141.0, 157.0];

/// Rolling average window counts per signal. Zero or one disables smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingAverage {
    pub hr: usize,
    pub speed: usize,
    pub elevation: usize,
}

impl Default for RollingAverage {
    fn default() -> Self {
        Self {
            hr: 0,
            speed: 5,
            elevation: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Moving-average threshold in m/s.
    pub not_moving_speed_ms: f64,
    /// Heart-rate zone boundaries in bpm, ascending.
    pub hr_zones: Vec<f64>,
    /// Report elevation in feet instead of meters.
    pub elevation_in_feet: bool,
    pub rolling_average: RollingAverage,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            not_moving_speed_ms: DEFAULT_NOT_MOVING_SPEED_MS,
            hr_zones: DEFAULT_HR_ZONES.to_vec(),
            elevation_in_feet: true,
            rolling_average: RollingAverage::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Loads from the file named by `STL_SETTINGS`, or defaults when unset.
    pub fn from_env() -> Result<Self, SettingsError> {
        match std::env::var(SETTINGS_ENV) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.not_moving_speed_ms.is_finite() || self.not_moving_speed_ms < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "not_moving_speed_ms must be a non-negative number, got {}",
                self.not_moving_speed_ms
            )));
        }
        if self.hr_zones.iter().any(|z| !z.is_finite() || *z <= 0.0) {
            return Err(SettingsError::Invalid(
                "hr_zones must be positive numbers".to_string(),
            ));
        }
        if self.hr_zones.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SettingsError::Invalid(
                "hr_zones must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }

    /// The not-moving threshold in the speed series' display unit (mph).
    pub fn not_moving_speed_mph(&self) -> f64 {
        self.not_moving_speed_ms * MS_TO_MPH
    }

    pub fn elevation_unit(&self) -> &'static str {
        if self.elevation_in_feet { "ft" } else { "m" }
    }
}
