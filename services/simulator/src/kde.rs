//! Gaussian kernel density estimate of trial proportions
//!
//! The smooth curve drawn over the density histogram. Bandwidth follows
//! Scott's rule and the curve is evaluated on an even grid spanning the
//! observed range.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub bandwidth: f64,
    pub points: Vec<DensityPoint>,
}

/// Scott's rule: `std * n^(-1/5)`, with the sample (n - 1) deviation
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let std_dev = values.std_dev();
    let bandwidth = std_dev * (values.len() as f64).powf(-0.2);
    (bandwidth.is_finite() && bandwidth > 0.0).then_some(bandwidth)
}

/// Evaluate the estimate at `grid_size` evenly spaced points in `[min, max]`
///
/// Returns `None` when the data has no spread (fewer than two values or all
/// identical), since no bandwidth exists.
pub fn gaussian_kde(values: &[f64], grid_size: usize) -> Option<DensityCurve> {
    let bandwidth = scott_bandwidth(values)?;
    let kernel = Normal::new(0.0, bandwidth).ok()?;

    // Proportions repeat heavily, so weight each distinct value by its count
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut support: Vec<(f64, f64)> = Vec::new();
    for value in sorted {
        match support.last_mut() {
            Some((last, weight)) if *last == value => *weight += 1.0,
            _ => support.push((value, 1.0)),
        }
    }

    let low = support.first()?.0;
    let high = support.last()?.0;
    let total = values.len() as f64;
    let step = if grid_size > 1 {
        (high - low) / (grid_size - 1) as f64
    } else {
        0.0
    };

    let points = (0..grid_size)
        .map(|i| {
            let x = if i + 1 == grid_size { high } else { low + step * i as f64 };
            let density = support
                .iter()
                .map(|(value, weight)| weight * kernel.pdf(x - value))
                .sum::<f64>()
                / total;
            DensityPoint { x, density }
        })
        .collect();

    Some(DensityCurve { bandwidth, points })
}
