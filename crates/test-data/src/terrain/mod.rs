//! Terrain generation for synthetic workouts.

mod elevation;

pub use elevation::ElevationGenerator;
