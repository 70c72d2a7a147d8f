//! Local-maximum detection with prominence, spacing and width filters.
//!
//! Candidates are strict local maxima; a flat top counts once, at its middle
//! sample. The first and last samples are never peaks. Filters are applied in
//! a fixed order:
//!
//! 1. **Distance**: peaks closer than `distance` samples to a higher peak are
//!    dropped, processing the highest peaks first.
//! 2. **Prominence**: the height of the peak above the higher of the two
//!    lowest points reachable on each side before meeting a higher sample.
//! 3. **Width**: the horizontal extent of the peak at `rel_height` of its
//!    prominence below the top, with linear interpolation between samples.

/// Peak detection thresholds. `None` disables a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakConfig {
    /// Minimum prominence
    pub prominence: Option<f64>,
    /// Minimum horizontal distance between peaks, in samples
    pub distance: Option<usize>,
    /// Minimum width, in samples
    pub width: Option<f64>,
    /// Relative height at which the width is measured (0.5 = half prominence)
    pub rel_height: f64,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            prominence: None,
            distance: None,
            width: None,
            rel_height: 0.5,
        }
    }
}

impl PeakConfig {
    /// Thresholds used for cluster centroid trajectories.
    pub fn trajectory() -> Self {
        Self::default().prominence(2.0).distance(15).width(8.0)
    }

    pub fn prominence(mut self, prominence: f64) -> Self {
        self.prominence = Some(prominence);
        self
    }

    pub fn distance(mut self, distance: usize) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn rel_height(mut self, rel_height: f64) -> Self {
        self.rel_height = rel_height;
        self
    }
}

/// A detected peak with its measured properties.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Peak {
    /// Sample index of the peak
    pub index: usize,
    /// Prominence of the peak
    pub prominence: f64,
    /// Index of the left base
    pub left_base: usize,
    /// Index of the right base
    pub right_base: usize,
    /// Width at `rel_height`
    pub width: f64,
}

/// Find peaks in `x` satisfying `config`, in ascending index order.
pub fn find_peaks(x: &[f64], config: &PeakConfig) -> Vec<Peak> {
    let mut candidates = local_maxima(x);

    if let Some(distance) = config.distance {
        candidates = select_by_distance(x, &candidates, distance);
    }

    let mut peaks: Vec<Peak> = candidates
        .into_iter()
        .map(|index| {
            let (prominence, left_base, right_base) = prominence(x, index);
            Peak {
                index,
                prominence,
                left_base,
                right_base,
                width: f64::NAN,
            }
        })
        .collect();

    if let Some(min_prominence) = config.prominence {
        peaks.retain(|p| p.prominence >= min_prominence);
    }

    for peak in &mut peaks {
        peak.width = width(x, peak, config.rel_height);
    }

    if let Some(min_width) = config.width {
        peaks.retain(|p| p.width >= min_width);
    }

    peaks
}

/// Indices of strict local maxima, flat tops reduced to their middle sample.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Keep peaks at least `distance` samples from any higher kept peak.
fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let n = peaks.len();
    let mut keep = vec![true; n];

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        x[peaks[a]]
            .partial_cmp(&x[peaks[b]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < n && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep.iter())
        .filter(|(_, &k)| k)
        .map(|(&p, _)| p)
        .collect()
}

/// Prominence and bases of the peak at `index`.
fn prominence(x: &[f64], index: usize) -> (f64, usize, usize) {
    let top = x[index];

    let mut left_min = top;
    let mut left_base = index;
    let mut i = index;
    loop {
        if x[i] > top {
            break;
        }
        if x[i] < left_min {
            left_min = x[i];
            left_base = i;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = top;
    let mut right_base = index;
    for (i, &v) in x.iter().enumerate().skip(index) {
        if v > top {
            break;
        }
        if v < right_min {
            right_min = v;
            right_base = i;
        }
    }

    (top - left_min.max(right_min), left_base, right_base)
}

/// Width of a peak at `rel_height` of its prominence.
fn width(x: &[f64], peak: &Peak, rel_height: f64) -> f64 {
    let height = x[peak.index] - peak.prominence * rel_height;

    let mut i = peak.index;
    while peak.left_base < i && height < x[i] {
        i -= 1;
    }
    let mut left = i as f64;
    if x[i] < height {
        left += (height - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak.index;
    while i < peak.right_base && height < x[i] {
        i += 1;
    }
    let mut right = i as f64;
    if x[i] < height {
        right -= (height - x[i]) / (x[i - 1] - x[i]);
    }

    right - left
}
