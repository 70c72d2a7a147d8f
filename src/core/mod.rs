//! Core data structures: the labeled region matrix and lookup tables.

mod lookup;
mod matrix;

pub use lookup::RegionTable;
pub use matrix::{TimeSeriesMatrix, TimeSeriesMatrixBuilder, ValueLayout};
