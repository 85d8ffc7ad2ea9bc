use geo::Point;

use crate::units::{DEG2RAD, M2MI, R_EARTH_MILES};

/// Returns the great circle distance in meters between two positions given in
/// decimal degrees, assuming a spherical earth. Uses the Haversine formula.
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1 * DEG2RAD;
    let lon1 = lon1 * DEG2RAD;
    let lat2 = lat2 * DEG2RAD;
    let lon2 = lon2 * DEG2RAD;

    let slon = ((lon2 - lon1) / 2.0).sin();
    let slat = ((lat2 - lat1) / 2.0).sin();
    let a = slat * slat + lat1.cos() * lat2.cos() * slon * slon;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    R_EARTH_MILES / M2MI * c
}

/// Same as [`great_circle_distance`] for `geo` points (x = longitude, y = latitude).
pub fn distance_between(a: Point<f64>, b: Point<f64>) -> f64 {
    great_circle_distance(a.y(), a.x(), b.y(), b.x())
}
