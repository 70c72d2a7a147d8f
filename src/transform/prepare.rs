//! Preparation of raw daily counts for ordering and clustering.
//!
//! Raw counts go through back-filling, population normalisation, smoothing and
//! a logarithm. The result has no missing values, which every ordering
//! strategy and the clustering engine assume.

use super::window::{smooth, DEFAULT_SMOOTHING_WINDOW};
use crate::core::{RegionTable, TimeSeriesMatrix};
use crate::error::{RegionError, Result};
use crate::ordering::DEFAULT_ANCHOR;

/// Label prefix of the column built by [`with_complement`].
pub const COMPLEMENT_PREFIX: &str = "Italia_no_";

/// Population table key holding the national total.
pub const NATIONAL_TOTAL: &str = "Italia";

/// Replace values that are not strictly positive with the next valid value.
///
/// Values `<= 0` and non-finite values are invalid. A trailing run of
/// invalid values has nothing to borrow from and stays NaN.
pub fn backfill_non_positive(matrix: &TimeSeriesMatrix) -> TimeSeriesMatrix {
    matrix.map_columns(|_, column| {
        let mut filled = vec![f64::NAN; column.len()];
        let mut next = f64::NAN;
        for (i, &v) in column.iter().enumerate().rev() {
            if v.is_finite() && v > 0.0 {
                next = v;
            }
            filled[i] = next;
        }
        filled
    })
}

fn positive_population(population: &RegionTable, region: &str) -> Result<f64> {
    let pop = population.get(region)?;
    if pop.is_nan() || pop <= 0.0 {
        return Err(RegionError::InvalidParameter(format!(
            "population of {} must be positive, got {}",
            region, pop
        )));
    }
    Ok(pop)
}

/// Rescale every region to the population of `benchmark`.
///
/// Each column is multiplied by `population[benchmark] / population[region]`.
pub fn normalize_by_population(
    matrix: &TimeSeriesMatrix,
    population: &RegionTable,
    benchmark: &str,
) -> Result<TimeSeriesMatrix> {
    population.covers(matrix.regions())?;
    let reference = positive_population(population, benchmark)?;

    let mut factors = Vec::with_capacity(matrix.n_regions());
    for region in matrix.regions() {
        factors.push(reference / positive_population(population, region)?);
    }

    Ok(matrix.map_columns(|i, column| column.iter().map(|v| v * factors[i]).collect()))
}

/// Element-wise logarithm in the given base.
pub fn log_transform(matrix: &TimeSeriesMatrix, base: f64) -> Result<TimeSeriesMatrix> {
    if base.is_nan() || base <= 0.0 || base == 1.0 {
        return Err(RegionError::InvalidParameter(format!(
            "logarithm base must be positive and not 1, got {}",
            base
        )));
    }
    Ok(matrix.map_values(|v| v.log(base)))
}

/// Remove every row holding a non-finite value.
pub fn drop_incomplete_rows(matrix: &TimeSeriesMatrix) -> TimeSeriesMatrix {
    let columns = matrix.trajectories();
    matrix.filter_rows(|i| columns.iter().all(|c| c[i].is_finite()))
}

/// Settings for [`prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreparationConfig {
    /// Region whose population every region is scaled to.
    pub benchmark: String,
    /// Trailing rolling mean width, in days.
    pub window: usize,
    pub log_base: f64,
}

impl Default for PreparationConfig {
    fn default() -> Self {
        Self {
            benchmark: DEFAULT_ANCHOR.to_string(),
            window: DEFAULT_SMOOTHING_WINDOW,
            log_base: 2.0,
        }
    }
}

impl PreparationConfig {
    pub fn benchmark(mut self, region: impl Into<String>) -> Self {
        self.benchmark = region.into();
        self
    }

    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn log_base(mut self, base: f64) -> Self {
        self.log_base = base;
        self
    }
}

/// Back-fill, normalise, smooth and log-transform raw counts.
///
/// Rows left incomplete (the smoothing warm-up, trailing gaps) are dropped.
/// Fails with `EmptyData` when no complete row survives.
pub fn prepare(
    matrix: &TimeSeriesMatrix,
    population: &RegionTable,
    config: &PreparationConfig,
) -> Result<TimeSeriesMatrix> {
    if matrix.is_empty() || matrix.n_regions() == 0 {
        return Err(RegionError::EmptyData);
    }

    let filled = backfill_non_positive(matrix);
    let normalized = normalize_by_population(&filled, population, &config.benchmark)?;
    let smoothed = smooth(&normalized, config.window)?;
    let logged = log_transform(&smoothed, config.log_base)?;
    let prepared = drop_incomplete_rows(&logged);

    log::debug!(
        "prepared {} regions: kept {} of {} days",
        prepared.n_regions(),
        prepared.len(),
        matrix.len()
    );
    if prepared.is_empty() {
        return Err(RegionError::EmptyData);
    }
    Ok(prepared)
}

/// Regions holding the lowest and highest value on the last day.
///
/// Non-finite values are skipped; ties go to the first column.
pub fn latest_extremes(matrix: &TimeSeriesMatrix) -> Result<(String, String)> {
    let last = matrix
        .len()
        .checked_sub(1)
        .and_then(|i| matrix.row(i))
        .ok_or(RegionError::EmptyData)?;

    let mut min: Option<usize> = None;
    let mut max: Option<usize> = None;
    for (i, &v) in last.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        if min.map_or(true, |m| v < last[m]) {
            min = Some(i);
        }
        if max.map_or(true, |m| v > last[m]) {
            max = Some(i);
        }
    }

    match (min, max) {
        (Some(lo), Some(hi)) => Ok((
            matrix.regions()[lo].clone(),
            matrix.regions()[hi].clone(),
        )),
        _ => Err(RegionError::EmptyData),
    }
}

/// Pair a region with the rest of the country.
///
/// `matrix` must hold every region. The result has two columns: `region` and
/// `"{COMPLEMENT_PREFIX}{region}"`, the row-wise sum of every other column.
/// The returned table extends `population` with the complement's population,
/// the [`NATIONAL_TOTAL`] entry minus the region's own.
pub fn with_complement(
    matrix: &TimeSeriesMatrix,
    region: &str,
    population: &RegionTable,
) -> Result<(TimeSeriesMatrix, RegionTable)> {
    let target = matrix
        .position(region)
        .ok_or_else(|| RegionError::UnknownRegion(region.to_string()))?;

    let rest: Vec<f64> = (0..matrix.len())
        .map(|t| {
            matrix
                .trajectories()
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != target)
                .map(|(_, column)| column[t])
                .sum()
        })
        .collect();

    let name = format!("{}{}", COMPLEMENT_PREFIX, region);
    let paired = matrix.select(&[region])?.with_column(name.clone(), rest)?;

    let rest_population = population.get(NATIONAL_TOTAL)? - population.get(region)?;
    let table = population.clone().with(name, rest_population);
    Ok((paired, table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn days(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn population() -> RegionTable {
        RegionTable::new()
            .with("Lombardia", 10_000.0)
            .with("Molise", 1_000.0)
            .with("Lazio", 5_000.0)
            .with("Italia", 16_000.0)
    }

    // ==================== backfill ====================

    #[test]
    fn backfill_takes_next_valid_value() {
        let m = TimeSeriesMatrix::from_columns(
            days(6),
            vec![("Molise", vec![0.0, -2.0, 3.0, f64::NAN, 5.0, 0.0])],
        )
        .unwrap();
        let filled = backfill_non_positive(&m);
        let col = filled.column("Molise").unwrap();
        assert_eq!(&col[..5], &[3.0, 3.0, 3.0, 5.0, 5.0]);
        assert!(col[5].is_nan());
    }

    // ==================== normalize ====================

    #[test]
    fn normalize_scales_to_benchmark() {
        let m = TimeSeriesMatrix::from_columns(
            days(2),
            vec![("Lombardia", vec![100.0, 200.0]), ("Molise", vec![10.0, 20.0])],
        )
        .unwrap();
        let n = normalize_by_population(&m, &population(), "Lombardia").unwrap();
        assert_eq!(n.column("Lombardia").unwrap(), &[100.0, 200.0]);
        assert_relative_eq!(n.column("Molise").unwrap()[1], 200.0, epsilon = 1e-10);
    }

    #[test]
    fn normalize_errors() {
        let m = TimeSeriesMatrix::from_columns(days(1), vec![("Sicilia", vec![1.0])]).unwrap();
        assert_eq!(
            normalize_by_population(&m, &population(), "Lombardia").unwrap_err(),
            RegionError::UnknownRegion("Sicilia".to_string())
        );

        let m = TimeSeriesMatrix::from_columns(days(1), vec![("Molise", vec![1.0])]).unwrap();
        assert_eq!(
            normalize_by_population(&m, &population(), "Umbria").unwrap_err(),
            RegionError::UnknownRegion("Umbria".to_string())
        );

        let empty_pop = RegionTable::new().with("Molise", 0.0).with("Lombardia", 1.0);
        assert!(matches!(
            normalize_by_population(&m, &empty_pop, "Lombardia"),
            Err(RegionError::InvalidParameter(_))
        ));
    }

    // ==================== log / drop ====================

    #[test]
    fn log_base_two() {
        let m = TimeSeriesMatrix::from_columns(days(3), vec![("a", vec![1.0, 2.0, 8.0])]).unwrap();
        let l = log_transform(&m, 2.0).unwrap();
        assert_relative_eq!(l.column("a").unwrap()[2], 3.0, epsilon = 1e-12);
        assert!(log_transform(&m, 1.0).is_err());
        assert!(log_transform(&m, -2.0).is_err());
    }

    #[test]
    fn drop_rows_with_gaps() {
        let m = TimeSeriesMatrix::from_columns(
            days(4),
            vec![
                ("a", vec![f64::NAN, 1.0, 2.0, 3.0]),
                ("b", vec![1.0, 1.0, f64::NEG_INFINITY, 1.0]),
            ],
        )
        .unwrap();
        let d = drop_incomplete_rows(&m);
        assert_eq!(d.len(), 2);
        assert_eq!(d.column("a").unwrap(), &[1.0, 3.0]);
        assert_eq!(d.timestamps()[1], days(4)[3]);
        assert!(!d.has_missing_values());
    }

    // ==================== prepare ====================

    #[test]
    fn prepare_full_pipeline() {
        let m = TimeSeriesMatrix::from_columns(
            days(5),
            vec![
                ("Lombardia", vec![4.0, 4.0, 8.0, 8.0, 0.0]),
                ("Molise", vec![0.4, 0.0, 0.8, 0.8, 0.8]),
            ],
        )
        .unwrap();
        let config = PreparationConfig::default().window(2);
        let p = prepare(&m, &population(), &config).unwrap();

        // Day 0 is the smoothing warm-up; Lombardia's last day has nothing
        // to back-fill from.
        assert_eq!(p.len(), 3);
        assert_eq!(p.timestamps()[0], days(5)[1]);
        let lomb = p.column("Lombardia").unwrap();
        assert_relative_eq!(lomb[0], 2.0, epsilon = 1e-12); // log2(4)
        assert_relative_eq!(lomb[2], 3.0, epsilon = 1e-12); // log2(8)
        // Molise is scaled by 10 and back-filled: [4, 8, 8, 8, 8].
        let molise = p.column("Molise").unwrap();
        assert_relative_eq!(molise[0], 6.0f64.log2(), epsilon = 1e-12);
        assert_relative_eq!(molise[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn prepare_too_short_is_empty() {
        let m = TimeSeriesMatrix::from_columns(days(3), vec![("Lombardia", vec![1.0, 2.0, 3.0])])
            .unwrap();
        assert_eq!(
            prepare(&m, &population(), &PreparationConfig::default()).unwrap_err(),
            RegionError::EmptyData
        );
    }

    // ==================== latest_extremes ====================

    #[test]
    fn extremes_on_last_day() {
        let m = TimeSeriesMatrix::from_columns(
            days(2),
            vec![
                ("Lazio", vec![9.0, 2.0]),
                ("Molise", vec![0.0, 1.0]),
                ("Lombardia", vec![0.0, 5.0]),
                ("Veneto", vec![0.0, f64::NAN]),
            ],
        )
        .unwrap();
        let (lo, hi) = latest_extremes(&m).unwrap();
        assert_eq!(lo, "Molise");
        assert_eq!(hi, "Lombardia");
    }

    #[test]
    fn extremes_need_data() {
        let m = TimeSeriesMatrix::from_columns(days(1), vec![("a", vec![f64::NAN])]).unwrap();
        assert_eq!(latest_extremes(&m).unwrap_err(), RegionError::EmptyData);
    }

    // ==================== with_complement ====================

    #[test]
    fn complement_sums_other_regions() {
        let m = TimeSeriesMatrix::from_columns(
            days(2),
            vec![
                ("Lombardia", vec![10.0, 20.0]),
                ("Molise", vec![1.0, 2.0]),
                ("Lazio", vec![5.0, 6.0]),
            ],
        )
        .unwrap();
        let (paired, table) = with_complement(&m, "Molise", &population()).unwrap();

        assert_eq!(paired.regions(), &["Molise", "Italia_no_Molise"]);
        assert_eq!(paired.column("Italia_no_Molise").unwrap(), &[15.0, 26.0]);
        assert_eq!(table.get("Italia_no_Molise").unwrap(), 15_000.0);
        assert!(table.contains("Molise"));

        assert_eq!(
            with_complement(&m, "Umbria", &population()).unwrap_err(),
            RegionError::UnknownRegion("Umbria".to_string())
        );
    }
}
