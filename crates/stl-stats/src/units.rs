//! Unit constants and conversions.
//!
//! Values are stored in SI units internally (meters, m/s, milliseconds) and
//! converted to display units (feet, mph) at the edges.

/// Nominal radius of the earth in miles. The radius actually varies from
/// 3937 to 3976 mi.
pub const R_EARTH_MILES: f64 = 3956.0;

/// Multiplier to convert degrees to radians.
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Multiplier to convert meters to miles.
pub const M2MI: f64 = 0.000_621_371_192_24;

/// Multiplier to convert meters to feet.
pub const M2FT: f64 = 3.280_839_895;

/// Multiplier to convert seconds to hours.
pub const SEC2HR: f64 = 1.0 / 3600.0;

/// Multiplier to convert m/s to mph.
pub const MS_TO_MPH: f64 = M2MI / SEC2HR;

/// Milliseconds per second, for elapsed-time conversions.
pub const MS_PER_SEC: f64 = 1000.0;

#[inline]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * M2FT
}

#[inline]
pub fn ms_to_mph(speed_ms: f64) -> f64 {
    speed_ms * MS_TO_MPH
}
