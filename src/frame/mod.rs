//! Normalized observation table
//!
//! [`ObservationFrame::from_series`] is the normalizer: it validates the input
//! series, rescales each series to `[0, 1]` and sorts every row into one
//! canonical order. Everything downstream (layout, reconciliation) reads the
//! rows in that order.

use std::collections::HashSet;
use std::ops::Range;

use log::debug;

use crate::error::{Error, Result};
use crate::groupby::GroupBy;
use crate::series::{Observation, Series};
use crate::stats::descriptive::min_max;

/// Normalized value assigned to every row of a series with no spread
/// (a single observation, or all observations equal)
pub const DEGENERATE_NORMALIZED_VALUE: f64 = 0.5;

/// All observations of one render call, normalized and canonically sorted
///
/// Rows are ordered by `(series declaration index, id)`; the rows of one
/// series are therefore contiguous.
#[derive(Debug, Clone)]
pub struct ObservationFrame {
    series_names: Vec<String>,
    rows: Vec<Observation>,
    /// Row range of each series, by declaration index
    spans: Vec<Range<usize>>,
}

impl ObservationFrame {
    /// Validate, normalize and sort the given series
    ///
    /// # Errors
    /// [`Error::MalformedInput`] when the list is empty, a series is empty or
    /// unnamed, two series share a name, an id repeats inside a series, or a
    /// score is not finite.
    pub fn from_series(series: &[Series]) -> Result<Self> {
        validate(series)?;

        let total: usize = series.iter().map(Series::len).sum();
        let mut keys = Vec::with_capacity(total);
        let mut ids = Vec::with_capacity(total);
        let mut raw = Vec::with_capacity(total);
        for (index, s) in series.iter().enumerate() {
            for (id, value) in s.scores() {
                keys.push(index);
                ids.push(id.to_string());
                raw.push(value);
            }
        }

        let grouped = GroupBy::new(keys.clone(), &raw)?;
        let normalized = grouped.transform(|&index, values| {
            let (min, max) = min_max(values);
            if max <= min {
                debug!(
                    "series '{}' has no spread; normalized to {}",
                    series[index].name(),
                    DEGENERATE_NORMALIZED_VALUE
                );
            }
            min_max_scale(values)
        });

        let mut rows: Vec<Observation> = ids
            .into_iter()
            .zip(keys)
            .zip(raw.into_iter().zip(normalized))
            .map(|((id, series_index), (raw_value, normalized_value))| Observation {
                id,
                series: series[series_index].name().to_string(),
                series_index,
                raw_value,
                normalized_value,
            })
            .collect();

        rows.sort_by(|a, b| {
            a.series_index
                .cmp(&b.series_index)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut spans = Vec::with_capacity(series.len());
        let mut start = 0;
        for s in series {
            spans.push(start..start + s.len());
            start += s.len();
        }

        Ok(ObservationFrame {
            series_names: series.iter().map(|s| s.name().to_string()).collect(),
            rows,
            spans,
        })
    }

    /// Total number of observations
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in canonical order
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Series names in declaration order
    pub fn series_names(&self) -> &[String] {
        &self.series_names
    }

    pub fn series_count(&self) -> usize {
        self.series_names.len()
    }

    /// Rows of one series in canonical (id) order
    pub fn series_rows(&self, index: usize) -> &[Observation] {
        self.spans
            .get(index)
            .map(|span| &self.rows[span.clone()])
            .unwrap_or(&[])
    }

    /// Rows of one series ranked by normalized value, highest first
    ///
    /// The sort is stable, so equal values keep their id order. This is the
    /// same top-to-bottom order in which the layout places the glyphs.
    pub fn ranked_by_value(&self, index: usize) -> Vec<&Observation> {
        let mut ranked: Vec<&Observation> = self.series_rows(index).iter().collect();
        ranked.sort_by(|a, b| b.normalized_value.total_cmp(&a.normalized_value));
        ranked
    }
}

/// Rescale values to `[0, 1]` by min and max
///
/// A slice without spread maps to [`DEGENERATE_NORMALIZED_VALUE`].
/// Finite values whose range overflows `f64` are scaled on halves, so the
/// result still spans exactly `[0, 1]`.
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let (min, max) = min_max(values);
    if max <= min {
        return vec![DEGENERATE_NORMALIZED_VALUE; values.len()];
    }
    let range = max - min;
    if range.is_finite() {
        return values.iter().map(|&v| (v - min) / range).collect();
    }
    let (half_min, half_range) = (min / 2.0, max / 2.0 - min / 2.0);
    values
        .iter()
        .map(|&v| (v / 2.0 - half_min) / half_range)
        .collect()
}

fn validate(series: &[Series]) -> Result<()> {
    if series.is_empty() {
        return Err(Error::MalformedInput("no series given".into()));
    }

    let mut names = HashSet::new();
    for s in series {
        if s.name().is_empty() {
            return Err(Error::MalformedInput("series name must not be empty".into()));
        }
        if !names.insert(s.name()) {
            return Err(Error::MalformedInput(format!(
                "duplicate series name '{}'",
                s.name()
            )));
        }
        if s.is_empty() {
            return Err(Error::MalformedInput(format!(
                "series '{}' has no observations",
                s.name()
            )));
        }

        let mut ids = HashSet::new();
        for (id, value) in s.scores() {
            if !ids.insert(id) {
                return Err(Error::MalformedInput(format!(
                    "duplicate id '{}' in series '{}'",
                    id,
                    s.name()
                )));
            }
            if !value.is_finite() {
                return Err(Error::MalformedInput(format!(
                    "score for id '{}' in series '{}' is not finite",
                    id,
                    s.name()
                )));
            }
        }
    }

    Ok(())
}
