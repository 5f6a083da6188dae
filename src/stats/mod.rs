// Statistics used by the violin layout
//
// Descriptive statistics for normalization and bandwidth selection, and a
// Gaussian kernel density estimator for the violin bodies.

pub mod descriptive;
pub mod kde;

use crate::error::Result;

pub use self::kde::{DensityCurve, KdeSettings};

/// Compute basic descriptive statistics
///
/// # Example
/// ```rust
/// use violin_swarm::stats;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let stats = stats::describe(&data).unwrap();
/// assert_eq!(stats.mean, 3.0);
/// assert_eq!(stats.max, 5.0);
/// ```
pub fn describe<T: AsRef<[f64]>>(data: T) -> Result<DescriptiveStats> {
    descriptive::describe_impl(data.as_ref())
}

/// Descriptive statistics of one sample
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// Number of values
    pub count: usize,
    /// Mean
    pub mean: f64,
    /// Standard deviation (unbiased estimator, `ddof = 1`)
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// Maximum
    pub max: f64,
}

impl DescriptiveStats {
    /// Distance between maximum and minimum
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Estimate the density of `data` on an evenly spaced grid
///
/// Returns `Ok(None)` when the sample has no spread (a single value or all
/// values equal); there is no meaningful bandwidth in that case.
///
/// # Example
/// ```rust
/// use violin_swarm::stats::{self, KdeSettings};
///
/// let curve = stats::gaussian_kde(&[0.0, 0.5, 1.0], &KdeSettings::default())
///     .unwrap()
///     .unwrap();
/// assert_eq!(curve.support.len(), KdeSettings::default().grid_size);
/// ```
pub fn gaussian_kde<T: AsRef<[f64]>>(data: T, settings: &KdeSettings) -> Result<Option<DensityCurve>> {
    kde::gaussian_kde_impl(data.as_ref(), settings)
}
