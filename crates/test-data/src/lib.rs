//! Synthetic GPX workouts for exercising `stl-stats`.
//!
//! ```rust,ignore
//! use rand::SeedableRng;
//! use test_data::prelude::*;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let workout = WorkoutGenerator::new(7)
//!     .with_segments(2, 60)
//!     .with_hr_encoding(HrEncoding::EmbeddedLog)
//!     .generate(&mut rng);
//! let bytes = render_gpx(&workout)?;
//! ```

pub mod render;
pub mod terrain;
pub mod workout;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::render::{GpxWriteError, hr_log_line, render_gpx, write_plain_file};
    pub use crate::terrain::ElevationGenerator;
    pub use crate::workout::{Fix, HrEncoding, Workout, WorkoutConfig, WorkoutGenerator};
}
