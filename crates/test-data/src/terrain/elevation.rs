//! Perlin noise elevation profiles.

use noise::{NoiseFn, Perlin};

/// Fractal Perlin terrain sampled by latitude and longitude in degrees.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Mean elevation in meters.
    base_elevation: f64,
    /// Largest deviation from the base in meters.
    height_scale: f64,
    /// Noise cycles per degree.
    frequency: f64,
    octaves: u32,
}

impl ElevationGenerator {
    /// Rolling hills a few tens of meters high with roughly 2 km wavelength.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 300.0,
            height_scale: 40.0,
            frequency: 50.0,
            octaves: 3,
        }
    }

    /// Foothill terrain with climbs of a couple of hundred meters.
    pub fn hilly(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1650.0,
            height_scale: 200.0,
            frequency: 30.0,
            octaves: 5,
        }
    }

    /// Elevation in meters at a position.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.perlin.get([lat * frequency, lon * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        self.base_elevation + (total / max_amplitude) * self.height_scale
    }
}
