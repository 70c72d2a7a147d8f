//! Labeled matrix of regional time series.

use crate::error::{RegionError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Layout of the values handed to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueLayout {
    /// Each inner vector is one region (column-major).
    #[default]
    Column,
    /// Each inner vector is one day across all regions (row-major).
    Row,
}

/// Daily values for a set of regions.
///
/// Rows are strictly increasing timestamps, columns are uniquely named regions.
/// Values are stored column-major: `values[region][day]`, so each region
/// trajectory is a contiguous slice.
///
/// Ordering and clustering expect finite values; removing NaN is up to the
/// caller (see [`crate::transform::drop_incomplete_rows`]).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeriesMatrix {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Vec<f64>>,
    regions: Vec<String>,
}

/// Builder for constructing a [`TimeSeriesMatrix`].
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesMatrixBuilder {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Vec<f64>>,
    layout: ValueLayout,
    regions: Vec<String>,
}

impl TimeSeriesMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Add one region column.
    pub fn region(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.layout = ValueLayout::Column;
        self.regions.push(name.into());
        self.values.push(values);
        self
    }

    /// Set all values at once with the given layout.
    pub fn values(mut self, values: Vec<Vec<f64>>, layout: ValueLayout) -> Self {
        self.values = values;
        self.layout = layout;
        self
    }

    pub fn regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn build(self) -> Result<TimeSeriesMatrix> {
        TimeSeriesMatrix::new(self.timestamps, self.values, self.layout, self.regions)
    }
}

fn transpose(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dims = rows.first().map(|r| r.len()).unwrap_or(0);
    (0..dims)
        .map(|d| rows.iter().map(|row| row[d]).collect())
        .collect()
}

impl TimeSeriesMatrix {
    /// Create a new matrix, validating shape, timestamps and labels.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<Vec<f64>>,
        layout: ValueLayout,
        regions: Vec<String>,
    ) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(RegionError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        let values = match layout {
            ValueLayout::Column => {
                for column in &values {
                    if column.len() != timestamps.len() {
                        return Err(RegionError::DimensionMismatch {
                            expected: timestamps.len(),
                            got: column.len(),
                        });
                    }
                }
                values
            }
            ValueLayout::Row => {
                if values.len() != timestamps.len() {
                    return Err(RegionError::DimensionMismatch {
                        expected: timestamps.len(),
                        got: values.len(),
                    });
                }
                let dims = values.first().map(|r| r.len()).unwrap_or(regions.len());
                for row in &values {
                    if row.len() != dims {
                        return Err(RegionError::DimensionMismatch {
                            expected: dims,
                            got: row.len(),
                        });
                    }
                }
                if values.is_empty() {
                    vec![Vec::new(); dims]
                } else {
                    transpose(&values)
                }
            }
        };

        if regions.len() != values.len() {
            return Err(RegionError::DimensionMismatch {
                expected: values.len(),
                got: regions.len(),
            });
        }

        let mut seen = HashSet::with_capacity(regions.len());
        for region in &regions {
            if region.is_empty() {
                return Err(RegionError::InvalidParameter(
                    "region names must not be empty".to_string(),
                ));
            }
            if !seen.insert(region.as_str()) {
                return Err(RegionError::DuplicateRegion(region.clone()));
            }
        }

        Ok(Self {
            timestamps,
            values,
            regions,
        })
    }

    /// Create a matrix from `(region, values)` pairs.
    pub fn from_columns<S: Into<String>>(
        timestamps: Vec<DateTime<Utc>>,
        columns: Vec<(S, Vec<f64>)>,
    ) -> Result<Self> {
        let (regions, values): (Vec<String>, Vec<Vec<f64>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();
        Self::new(timestamps, values, ValueLayout::Column, regions)
    }

    pub fn builder() -> TimeSeriesMatrixBuilder {
        TimeSeriesMatrixBuilder::new()
    }

    /// Number of days (rows).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of regions (columns).
    pub fn n_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Region identifiers in column order.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// All region trajectories, in column order.
    pub fn trajectories(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Column index of a region.
    pub fn position(&self, region: &str) -> Option<usize> {
        self.regions.iter().position(|r| r == region)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.position(region).is_some()
    }

    /// Trajectory of a region by name.
    pub fn column(&self, region: &str) -> Result<&[f64]> {
        self.position(region)
            .map(|i| self.values[i].as_slice())
            .ok_or_else(|| RegionError::UnknownRegion(region.to_string()))
    }

    /// Values of every region on one day.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.len() {
            return None;
        }
        Some(self.values.iter().map(|column| column[index]).collect())
    }

    /// Check for NaN or infinite values.
    pub fn has_missing_values(&self) -> bool {
        self.values
            .iter()
            .any(|column| column.iter().any(|v| !v.is_finite()))
    }

    /// Extract the rows `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeriesMatrix> {
        if start > end {
            return Err(RegionError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(RegionError::DimensionMismatch {
                expected: self.len(),
                got: end,
            });
        }

        Ok(TimeSeriesMatrix {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self
                .values
                .iter()
                .map(|column| column[start..end].to_vec())
                .collect(),
            regions: self.regions.clone(),
        })
    }

    /// Keep only the rows for which `keep(row_index)` is true.
    pub fn filter_rows<F>(&self, keep: F) -> TimeSeriesMatrix
    where
        F: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        TimeSeriesMatrix {
            timestamps: rows.iter().map(|&i| self.timestamps[i]).collect(),
            values: self
                .values
                .iter()
                .map(|column| rows.iter().map(|&i| column[i]).collect())
                .collect(),
            regions: self.regions.clone(),
        }
    }

    /// Subset of regions, in the order given.
    pub fn select<S: AsRef<str>>(&self, regions: &[S]) -> Result<TimeSeriesMatrix> {
        let mut values = Vec::with_capacity(regions.len());
        let mut names = Vec::with_capacity(regions.len());
        for region in regions {
            let region = region.as_ref();
            values.push(self.column(region)?.to_vec());
            names.push(region.to_string());
        }
        TimeSeriesMatrix::new(self.timestamps.clone(), values, ValueLayout::Column, names)
    }

    /// Apply `f(region_index, trajectory)` to every column, producing a new matrix.
    pub fn map_columns<F>(&self, f: F) -> TimeSeriesMatrix
    where
        F: Fn(usize, &[f64]) -> Vec<f64>,
    {
        TimeSeriesMatrix {
            timestamps: self.timestamps.clone(),
            values: self
                .values
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let mapped = f(i, column);
                    debug_assert_eq!(mapped.len(), column.len());
                    mapped
                })
                .collect(),
            regions: self.regions.clone(),
        }
    }

    /// Apply `f` element-wise, producing a new matrix.
    pub fn map_values<F>(&self, f: F) -> TimeSeriesMatrix
    where
        F: Fn(f64) -> f64,
    {
        self.map_columns(|_, column| column.iter().map(|&v| f(v)).collect())
    }

    /// Append a region column, producing a new matrix.
    pub fn with_column(&self, region: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let mut regions = self.regions.clone();
        let mut columns = self.values.clone();
        regions.push(region.into());
        columns.push(values);
        TimeSeriesMatrix::new(
            self.timestamps.clone(),
            columns,
            ValueLayout::Column,
            regions,
        )
    }
}
