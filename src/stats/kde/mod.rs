// Gaussian kernel density estimation

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::stats::descriptive::describe_impl;

/// Kernel density estimation parameters
#[derive(Debug, Clone)]
pub struct KdeSettings {
    /// Number of evaluation points
    pub grid_size: usize,
    /// How many bandwidths the support extends past the data extremes
    pub cut: f64,
    /// Multiplier applied to Scott's bandwidth
    pub bw_adjust: f64,
}

impl Default for KdeSettings {
    fn default() -> Self {
        KdeSettings {
            grid_size: 100,
            cut: 2.0,
            bw_adjust: 1.0,
        }
    }
}

/// Density evaluated on an evenly spaced support grid
#[derive(Debug, Clone)]
pub struct DensityCurve {
    /// Evaluation points, ascending
    pub support: Vec<f64>,
    /// Density at each support point
    pub density: Vec<f64>,
    /// Kernel bandwidth that produced the curve
    pub bandwidth: f64,
}

impl DensityCurve {
    /// Largest density value on the grid
    pub fn peak(&self) -> f64 {
        self.density.iter().cloned().fold(0.0, f64::max)
    }

    /// First and last support point
    pub fn extent(&self) -> (f64, f64) {
        match (self.support.first(), self.support.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 0.0),
        }
    }
}

/// Internal implementation of [`crate::stats::gaussian_kde`]
pub(crate) fn gaussian_kde_impl(data: &[f64], settings: &KdeSettings) -> Result<Option<DensityCurve>> {
    if settings.grid_size < 2 {
        return Err(Error::MalformedInput(format!(
            "KDE grid needs at least 2 points, got {}",
            settings.grid_size
        )));
    }

    let stats = describe_impl(data)?;
    if stats.count < 2 || stats.std <= 0.0 {
        return Ok(None);
    }

    // Scott's rule for one dimension
    let factor = (stats.count as f64).powf(-0.2);
    let bandwidth = stats.std * factor * settings.bw_adjust;

    let lo = stats.min - settings.cut * bandwidth;
    let hi = stats.max + settings.cut * bandwidth;
    let step = (hi - lo) / (settings.grid_size - 1) as f64;

    let norm = 1.0 / (stats.count as f64 * bandwidth * (2.0 * PI).sqrt());
    let support: Vec<f64> = (0..settings.grid_size)
        .map(|i| lo + step * i as f64)
        .collect();
    let density = support
        .iter()
        .map(|&x| {
            let sum: f64 = data
                .iter()
                .map(|&xi| {
                    let z = (x - xi) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * norm
        })
        .collect();

    Ok(Some(DensityCurve {
        support,
        density,
        bandwidth,
    }))
}
