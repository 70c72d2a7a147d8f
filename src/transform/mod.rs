//! Data transformations for regional daily counts.
//!
//! Provides back-filling, population normalisation, rolling smoothing and the
//! logarithmic transform that turn raw counts into a NaN-free matrix.
//!
//! # Example
//!
//! ```
//! use regional_trends::transform::rolling_mean;
//!
//! let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! // Rolling mean with window 3
//! let rm = rolling_mean(&series, 3, false);
//! assert!(rm[1].is_nan());
//! assert_eq!(rm[4], 4.0);
//! ```

pub mod prepare;
pub mod window;

pub use prepare::{
    backfill_non_positive, drop_incomplete_rows, latest_extremes, log_transform,
    normalize_by_population, prepare, with_complement, PreparationConfig, COMPLEMENT_PREFIX,
    NATIONAL_TOTAL,
};

pub use window::{rolling_mean, smooth, DEFAULT_SMOOTHING_WINDOW};
