// Descriptive statistics

use crate::error::{Error, Result};
use crate::stats::DescriptiveStats;

/// Internal implementation of [`crate::stats::describe`]
pub(crate) fn describe_impl(data: &[f64]) -> Result<DescriptiveStats> {
    if data.is_empty() {
        return Err(Error::MalformedInput(
            "descriptive statistics need at least one value".into(),
        ));
    }

    let count = data.len();
    let mean = data.iter().sum::<f64>() / count as f64;

    // Unbiased variance; a single value has no spread
    let variance = if count > 1 {
        let sum_squared_diff = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
        sum_squared_diff / (count - 1) as f64
    } else {
        0.0
    };

    let (min, max) = min_max(data);

    Ok(DescriptiveStats {
        count,
        mean,
        std: variance.sqrt(),
        min,
        max,
    })
}

/// Smallest and largest value; `(inf, -inf)` for an empty slice
pub(crate) fn min_max(data: &[f64]) -> (f64, f64) {
    data.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_basic() {
        let stats = describe_impl(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, 5.0);
        assert!((stats.std - 2.138089935299395).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.range(), 7.0);
    }

    #[test]
    fn test_describe_single_value() {
        let stats = describe_impl(&[42.0]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.range(), 0.0);
    }

    #[test]
    fn test_describe_empty() {
        assert!(describe_impl(&[]).is_err());
    }
}
