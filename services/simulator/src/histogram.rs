//! Density histogram of trial proportions
//!
//! Produces the bars, smoothed curve and mean marker a front end needs to
//! draw the distribution of observed head proportions.

use serde::{Deserialize, Serialize};

use crate::constants::{KDE_GRID_SIZE, MAX_HISTOGRAM_BINS};
use crate::errors::{Result, SimulationError};
use crate::kde::{gaussian_kde, DensityCurve};
use crate::types::TrialResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
    /// `count / (total * width)`; bar areas sum to one
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub total: u64,
    /// Gaussian KDE over the same range; absent when the data has no spread
    pub kde: Option<DensityCurve>,
}

/// Percentile of sorted data, interpolating linearly between closest ranks
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * fraction;
    let below = position.floor() as usize;
    let above = (below + 1).min(sorted.len() - 1);
    sorted[below] + (sorted[above] - sorted[below]) * (position - below as f64)
}

/// numpy's `"auto"` estimator
///
/// Uses the narrower of the Sturges and Freedman-Diaconis widths
/// (`2 * IQR * n^(-1/3)`), falling back to Sturges when the interquartile
/// range is zero. Data with no spread gets a single bin.
pub fn auto_bin_count(values: &[f64]) -> usize {
    if values.len() <= 1 {
        return 1;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let range = sorted[sorted.len() - 1] - sorted[0];
    if range <= 0.0 {
        return 1;
    }

    let sturges_width = range / (n.log2() + 1.0);
    let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);
    let fd_width = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd_width > 0.0 {
        fd_width.min(sturges_width)
    } else {
        sturges_width
    };

    ((range / width).ceil() as usize).clamp(1, MAX_HISTOGRAM_BINS)
}

impl Histogram {
    /// Bin `results` into equal-width bins over their range
    ///
    /// `bins = None` picks the count with [`auto_bin_count`]. When every
    /// value is identical the range is widened to `[v - 0.5, v + 0.5]`.
    ///
    /// # Errors
    /// `InvalidParameter` for empty results or a bin count of zero or above
    /// the supported maximum; `NumericalDegeneracy` for non-finite values.
    pub fn density(results: &TrialResult, bins: Option<usize>) -> Result<Self> {
        if results.is_empty() {
            return Err(SimulationError::invalid("results", "at least one trial is required"));
        }
        if results.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::degenerate(
                "cannot bin non-finite trial proportions",
            ));
        }

        let bin_count = match bins {
            Some(0) => return Err(SimulationError::invalid("bins", "must be at least 1")),
            Some(n) if n > MAX_HISTOGRAM_BINS => {
                return Err(SimulationError::invalid(
                    "bins",
                    format!("{} exceeds the maximum of {}", n, MAX_HISTOGRAM_BINS),
                ))
            }
            Some(n) => n,
            None => auto_bin_count(results.proportions()),
        };

        let (mut low, mut high) = results
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if low == high {
            low -= 0.5;
            high += 0.5;
        }

        let width = (high - low) / bin_count as f64;
        let mut counts = vec![0u64; bin_count];
        for value in results.iter() {
            // The last bin is closed on the right
            let index = (((value - low) / width) as usize).min(bin_count - 1);
            counts[index] += 1;
        }

        let total = results.len() as u64;
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: low + width * i as f64,
                upper: if i + 1 == bin_count {
                    high
                } else {
                    low + width * (i + 1) as f64
                },
                count,
                density: count as f64 / (total as f64 * width),
            })
            .collect();

        let mean = results
            .mean()
            .ok_or_else(|| SimulationError::invalid("results", "at least one trial is required"))?;

        let kde = gaussian_kde(results.proportions(), KDE_GRID_SIZE);

        Ok(Self {
            bins,
            mean,
            total,
            kde,
        })
    }

    /// Area under the bars, 1.0 up to rounding
    pub fn area(&self) -> f64 {
        self.bins
            .iter()
            .map(|bin| bin.density * (bin.upper - bin.lower))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_counts_and_area() {
        let results = TrialResult::from(vec![0.0, 0.25, 0.5, 0.5, 0.75, 1.0]);
        let hist = Histogram::density(&results, Some(4)).unwrap();

        assert_eq!(hist.bins.len(), 4);
        let counts: Vec<u64> = hist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 2, 2]);
        assert_eq!(hist.total, 6);
        assert!((hist.area() - 1.0).abs() < 1e-12);
        assert!((hist.mean - 0.5).abs() < 1e-12);
        assert_eq!(hist.bins[0].lower, 0.0);
        assert_eq!(hist.bins[3].upper, 1.0);
    }

    #[test]
    fn test_identical_values_widen_range() {
        let results = TrialResult::from(vec![0.5, 0.5, 0.5]);
        let hist = Histogram::density(&results, Some(2)).unwrap();
        assert_eq!(hist.bins[0].lower, 0.0);
        assert_eq!(hist.bins[1].upper, 1.0);
        assert_eq!(hist.bins[1].count, 3);
        assert!((hist.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_automatic_bins_uniform_data_uses_sturges() {
        // Freedman-Diaconis width 0.0999 is wider than Sturges' 0.0911
        let results = TrialResult::from((0..1000).map(|i| i as f64 / 1000.0).collect::<Vec<_>>());
        let hist = Histogram::density(&results, None).unwrap();
        assert_eq!(hist.bins.len(), 11);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<u64>(), 1000);
    }

    #[test]
    fn test_automatic_bins_concentrated_data_uses_freedman_diaconis() {
        // Two outliers stretch the range; the IQR stays narrow
        let mut values = vec![0.0, 1.0];
        values.extend((0..200).map(|i| 0.4 + 0.001 * i as f64));
        assert_eq!(auto_bin_count(&values), 30);

        let hist = Histogram::density(&TrialResult::from(values), None).unwrap();
        assert_eq!(hist.bins.len(), 30);
        assert!((hist.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_automatic_bins_zero_iqr_falls_back_to_sturges() {
        let mut values = vec![0.0; 10];
        values.push(1.0);
        assert_eq!(auto_bin_count(&values), 5);
        assert_eq!(auto_bin_count(&[0.3, 0.3, 0.3]), 1);
        assert_eq!(auto_bin_count(&[0.3]), 1);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 4.0);
        assert!((percentile(&sorted, 0.25) - 1.75).abs() < 1e-12);
        assert!((percentile(&sorted, 0.75) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_density_carries_kde_curve() {
        let results = TrialResult::from(vec![0.45, 0.5, 0.5, 0.55, 0.6]);
        let hist = Histogram::density(&results, None).unwrap();
        let kde = hist.kde.expect("spread data has a curve");
        assert_eq!(kde.points.len(), KDE_GRID_SIZE);
        assert_eq!(kde.points[0].x, 0.45);
        assert_eq!(kde.points[KDE_GRID_SIZE - 1].x, 0.6);
        assert!(kde.points.iter().all(|p| p.density > 0.0));

        let flat = Histogram::density(&TrialResult::from(vec![0.5, 0.5]), None).unwrap();
        assert!(flat.kde.is_none());
        assert_eq!(flat.bins.len(), 1);
    }

    #[test]
    fn test_density_validation() {
        let results = TrialResult::from(vec![0.5]);
        assert!(Histogram::density(&results, Some(0)).is_err());
        assert!(Histogram::density(&results, Some(MAX_HISTOGRAM_BINS + 1)).is_err());
        assert!(Histogram::density(&TrialResult::from(Vec::new()), None).is_err());
        assert!(Histogram::density(&TrialResult::from(vec![f64::NAN]), None).is_err());
    }
}
